use sqlx::Result as SqlxResult;
use thiserror::Error;
use uuid::Uuid;

use crate::db::Db;
use crate::membership::{self, ClubSlots, MembershipError};
use crate::models::StudentRow;
use crate::pagination::LimitOffset;

const STUDENT_COLUMNS: &str = "id, grade_class_num, last_name, first_name, last_kana, first_kana, \
     club_name, club_name_2, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct StudentSearch {
    /// Substring match on the grade/class label.
    pub grade_class_num: Option<String>,
    /// Substring match on last or first name.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub grade_class_num: String,
    pub last_name: String,
    pub first_name: String,
    pub last_kana: Option<String>,
    pub first_kana: Option<String>,
    pub club_name: String,
    pub club_name_2: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StudentInputError {
    #[error("grade/class label is required")]
    MissingGradeClass,
    #[error("last name is required")]
    MissingLastName,
    #[error("first name is required")]
    MissingFirstName,
    #[error("primary club is required")]
    MissingClub,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl NewStudent {
    /// Trim every field, map blank optionals to NULL, reject missing
    /// required fields before anything reaches the store.
    pub fn normalized(mut self) -> Result<Self, StudentInputError> {
        self.grade_class_num = self.grade_class_num.trim().to_owned();
        self.last_name = self.last_name.trim().to_owned();
        self.first_name = self.first_name.trim().to_owned();
        self.club_name = self.club_name.trim().to_owned();
        self.last_kana = blank_to_none(self.last_kana);
        self.first_kana = blank_to_none(self.first_kana);
        self.club_name_2 = blank_to_none(self.club_name_2);

        if self.grade_class_num.is_empty() {
            return Err(StudentInputError::MissingGradeClass);
        }
        if self.last_name.is_empty() {
            return Err(StudentInputError::MissingLastName);
        }
        if self.first_name.is_empty() {
            return Err(StudentInputError::MissingFirstName);
        }
        if self.club_name.is_empty() {
            return Err(StudentInputError::MissingClub);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignSummary {
    pub assigned: u32,
    pub skipped: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveSummary {
    pub removed: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub updated: u32,
}

#[derive(Clone)]
pub struct StudentRepo {
    pool: Db,
}

impl StudentRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<StudentRow>> {
        sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Students belonging to a club through either slot, in kana order.
    pub async fn list_for_club(&self, club: &str) -> SqlxResult<Vec<StudentRow>> {
        sqlx::query_as::<_, StudentRow>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE club_name = $1 OR club_name_2 = $1
            ORDER BY last_kana ASC NULLS LAST, first_kana ASC NULLS LAST
            "#
        ))
        .bind(club)
        .fetch_all(&self.pool)
        .await
    }

    /// Whole-school search for the assignment surface, with an exact total
    /// for the pager.
    pub async fn search(
        &self,
        filter: StudentSearch,
        page: LimitOffset,
    ) -> SqlxResult<(Vec<StudentRow>, i64)> {
        let grade = blank_to_none(filter.grade_class_num).map(|g| format!("%{g}%"));
        let name = blank_to_none(filter.name).map(|n| format!("%{n}%"));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM students
            WHERE ($1::text IS NULL OR grade_class_num ILIKE $1)
              AND ($2::text IS NULL OR last_name ILIKE $2 OR first_name ILIKE $2)
            "#,
        )
        .bind(&grade)
        .bind(&name)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE ($1::text IS NULL OR grade_class_num ILIKE $1)
              AND ($2::text IS NULL OR last_name ILIKE $2 OR first_name ILIKE $2)
            ORDER BY last_kana ASC NULLS LAST, first_kana ASC NULLS LAST
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(&grade)
        .bind(&name)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    pub async fn create(&self, data: NewStudent) -> SqlxResult<StudentRow> {
        sqlx::query_as::<_, StudentRow>(&format!(
            r#"
            INSERT INTO students
                (grade_class_num, last_name, first_name, last_kana, first_kana, club_name, club_name_2)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(data.grade_class_num)
        .bind(data.last_name)
        .bind(data.first_name)
        .bind(data.last_kana)
        .bind(data.first_kana)
        .bind(data.club_name)
        .bind(data.club_name_2)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, data: NewStudent) -> SqlxResult<Option<StudentRow>> {
        sqlx::query_as::<_, StudentRow>(&format!(
            r#"
            UPDATE students
            SET grade_class_num = $2, last_name = $3, first_name = $4,
                last_kana = $5, first_kana = $6, club_name = $7, club_name_2 = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.grade_class_num)
        .bind(data.last_name)
        .bind(data.first_name)
        .bind(data.last_kana)
        .bind(data.first_kana)
        .bind(data.club_name)
        .bind(data.club_name_2)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_slots(&self, id: Uuid) -> SqlxResult<Option<ClubSlots>> {
        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT club_name, club_name_2 FROM students WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(primary, secondary)| ClubSlots::from_columns(&primary, secondary.as_deref())))
    }

    async fn write_slots(&self, id: Uuid, slots: &ClubSlots) -> SqlxResult<()> {
        sqlx::query(
            "UPDATE students SET club_name = $2, club_name_2 = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(slots.primary_column())
        .bind(slots.secondary_column())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Put every selected student into `target_club`'s first free slot.
    ///
    /// Students are handled independently, not as one transaction: a student
    /// that already holds the club, has both slots taken, or fails to
    /// read/write counts as skipped and the batch carries on.
    pub async fn assign_to_club(
        &self,
        student_ids: &[Uuid],
        target_club: &str,
    ) -> Result<AssignSummary, MembershipError> {
        let club = validated_club(target_club)?;
        ensure_students(student_ids)?;

        let mut summary = AssignSummary::default();
        for &id in student_ids {
            let slots = match self.fetch_slots(id).await {
                Ok(Some(slots)) => slots,
                Ok(None) => {
                    summary.skipped += 1;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(student_id = %id, error = %err, "assign: slot read failed");
                    summary.skipped += 1;
                    continue;
                }
            };
            let Some(next) = membership::plan_assign(&slots, club) else {
                summary.skipped += 1;
                continue;
            };
            match self.write_slots(id, &next).await {
                Ok(()) => summary.assigned += 1,
                Err(err) => {
                    tracing::warn!(student_id = %id, error = %err, "assign: slot write failed");
                    summary.skipped += 1;
                }
            }
        }
        Ok(summary)
    }

    /// Remove `target_club` from every selected student, promoting the
    /// secondary slot when the primary is vacated.
    pub async fn remove_from_club(
        &self,
        student_ids: &[Uuid],
        target_club: &str,
    ) -> Result<RemoveSummary, MembershipError> {
        let club = validated_club(target_club)?;
        ensure_students(student_ids)?;

        let mut summary = RemoveSummary::default();
        for &id in student_ids {
            let slots = match self.fetch_slots(id).await {
                Ok(Some(slots)) => slots,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(student_id = %id, error = %err, "remove: slot read failed");
                    continue;
                }
            };
            let Some(next) = membership::plan_remove(&slots, club) else {
                continue;
            };
            match self.write_slots(id, &next).await {
                Ok(()) => summary.removed += 1,
                Err(err) => {
                    tracing::warn!(student_id = %id, error = %err, "remove: slot write failed");
                }
            }
        }
        Ok(summary)
    }

    /// Rewrite `from_club` to `to_club` in whichever slot holds it.
    pub async fn change_club(
        &self,
        student_ids: &[Uuid],
        from_club: &str,
        to_club: &str,
    ) -> Result<ChangeSummary, MembershipError> {
        let from = validated_club(from_club)?;
        let to = validated_club(to_club)?;
        ensure_students(student_ids)?;

        let mut summary = ChangeSummary::default();
        for &id in student_ids {
            let slots = match self.fetch_slots(id).await {
                Ok(Some(slots)) => slots,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(student_id = %id, error = %err, "change: slot read failed");
                    continue;
                }
            };
            let Some(next) = membership::plan_change(&slots, from, to) else {
                continue;
            };
            match self.write_slots(id, &next).await {
                Ok(()) => summary.updated += 1,
                Err(err) => {
                    tracing::warn!(student_id = %id, error = %err, "change: slot write failed");
                }
            }
        }
        Ok(summary)
    }
}

fn validated_club(club: &str) -> Result<&str, MembershipError> {
    let trimmed = club.trim();
    if trimmed.is_empty() {
        return Err(MembershipError::EmptyClubName);
    }
    Ok(trimmed)
}

fn ensure_students(student_ids: &[Uuid]) -> Result<(), MembershipError> {
    if student_ids.is_empty() {
        return Err(MembershipError::NoStudents);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_arguments_are_validated() {
        assert_eq!(validated_club("  "), Err(MembershipError::EmptyClubName));
        assert_eq!(validated_club(" 卓球部 "), Ok("卓球部"));
        assert_eq!(ensure_students(&[]), Err(MembershipError::NoStudents));
        assert!(ensure_students(&[Uuid::new_v4()]).is_ok());
    }

    #[test]
    fn normalization_trims_and_nulls_blanks() {
        let student = NewStudent {
            grade_class_num: " 2-1-15 ".into(),
            last_name: "三田村".into(),
            first_name: "和真".into(),
            last_kana: Some("  ".into()),
            first_kana: Some("かずま".into()),
            club_name: " 卓球部 ".into(),
            club_name_2: Some("".into()),
        }
        .normalized()
        .unwrap();
        assert_eq!(student.grade_class_num, "2-1-15");
        assert_eq!(student.club_name, "卓球部");
        assert_eq!(student.last_kana, None);
        assert_eq!(student.first_kana.as_deref(), Some("かずま"));
        assert_eq!(student.club_name_2, None);
    }

    #[test]
    fn normalization_rejects_missing_required_fields() {
        let base = NewStudent {
            grade_class_num: "2-1-15".into(),
            last_name: "三田村".into(),
            first_name: "和真".into(),
            last_kana: None,
            first_kana: None,
            club_name: "卓球部".into(),
            club_name_2: None,
        };

        let mut missing_club = base.clone();
        missing_club.club_name = " ".into();
        assert_eq!(
            missing_club.normalized(),
            Err(StudentInputError::MissingClub)
        );

        let mut missing_name = base;
        missing_name.first_name = String::new();
        assert_eq!(
            missing_name.normalized(),
            Err(StudentInputError::MissingFirstName)
        );
    }
}

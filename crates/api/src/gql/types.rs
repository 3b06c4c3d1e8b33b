use async_graphql::{Enum, InputObject, Json, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use infra::models::{CompetitionResultRow, NotificationRow, StudentRow, UserProfileRow};
use infra::payload::{self, ResultPayload};
use infra::repos::students;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum Division {
    Team,
    Individual,
}

impl From<payload::Division> for Division {
    fn from(value: payload::Division) -> Self {
        match value {
            payload::Division::Team => Division::Team,
            payload::Division::Individual => Division::Individual,
        }
    }
}

impl From<Division> for payload::Division {
    fn from(value: Division) -> Self {
        match value {
            Division::Team => payload::Division::Team,
            Division::Individual => payload::Division::Individual,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Student {
    pub id: ID,
    pub grade_class_num: String,
    pub last_name: String,
    pub first_name: String,
    pub last_kana: Option<String>,
    pub first_kana: Option<String>,
    pub club_name: String,
    pub club_name_2: Option<String>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id.into(),
            grade_class_num: row.grade_class_num,
            last_name: row.last_name,
            first_name: row.first_name,
            last_kana: row.last_kana,
            first_kana: row.first_kana,
            club_name: row.club_name,
            club_name_2: row.club_name_2,
        }
    }
}

#[derive(SimpleObject)]
pub struct StudentPage {
    pub students: Vec<Student>,
    pub total: i64,
}

#[derive(SimpleObject)]
pub struct CompetitionResult {
    pub id: ID,
    pub club_name: String,
    pub competition_name: Option<String>,
    pub division: Division,
    pub payload: Json<ResultPayload>,
    pub special_prizes: Option<String>,
    pub date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_signboard_requested: bool,
    pub created_at: DateTime<Utc>,
    /// Explicit competition date, falling back to the record's creation day.
    pub display_date: NaiveDate,
    pub display_score: Option<String>,
    pub display_members: String,
}

impl From<CompetitionResultRow> for CompetitionResult {
    fn from(row: CompetitionResultRow) -> Self {
        let display_date = row.display_date();
        let display_score = row.payload().display_score().map(str::to_owned);
        let display_members = row.payload().display_members();
        let division = row.payload().division().into();
        Self {
            id: row.id.into(),
            club_name: row.club_name,
            competition_name: row.competition_name,
            division,
            payload: Json(row.payload.0),
            special_prizes: row.special_prizes,
            date: row.date,
            end_date: row.end_date,
            is_signboard_requested: row.is_signboard_requested,
            created_at: row.created_at,
            display_date,
            display_score,
            display_members,
        }
    }
}

/// Filtered result list plus the dropdown option sets derived from it.
#[derive(SimpleObject)]
pub struct ResultDashboard {
    pub results: Vec<CompetitionResult>,
    pub club_options: Vec<String>,
    pub class_options: Vec<String>,
    pub student_options: Vec<String>,
}

#[derive(SimpleObject)]
pub struct Notification {
    pub id: ID,
    pub user_id: ID,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[derive(SimpleObject)]
pub struct UserProfile {
    pub id: ID,
    pub assigned_club: Option<String>,
    pub is_signboard_manager: bool,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            id: row.id.into(),
            assigned_club: row.assigned_club,
            is_signboard_manager: row.is_signboard_manager,
        }
    }
}

#[derive(SimpleObject)]
pub struct AssignSummary {
    pub assigned: i32,
    pub skipped: i32,
}

impl From<students::AssignSummary> for AssignSummary {
    fn from(s: students::AssignSummary) -> Self {
        Self {
            assigned: s.assigned as i32,
            skipped: s.skipped as i32,
        }
    }
}

#[derive(SimpleObject)]
pub struct RemoveSummary {
    pub removed: i32,
}

impl From<students::RemoveSummary> for RemoveSummary {
    fn from(s: students::RemoveSummary) -> Self {
        Self {
            removed: s.removed as i32,
        }
    }
}

#[derive(SimpleObject)]
pub struct ChangeSummary {
    pub updated: i32,
}

impl From<students::ChangeSummary> for ChangeSummary {
    fn from(s: students::ChangeSummary) -> Self {
        Self {
            updated: s.updated as i32,
        }
    }
}

#[derive(InputObject)]
pub struct StudentInput {
    pub grade_class_num: String,
    pub last_name: String,
    pub first_name: String,
    pub last_kana: Option<String>,
    pub first_kana: Option<String>,
    pub club_name: String,
    pub club_name_2: Option<String>,
}

impl From<StudentInput> for students::NewStudent {
    fn from(input: StudentInput) -> Self {
        Self {
            grade_class_num: input.grade_class_num,
            last_name: input.last_name,
            first_name: input.first_name,
            last_kana: input.last_kana,
            first_kana: input.first_kana,
            club_name: input.club_name,
            club_name_2: input.club_name_2,
        }
    }
}

#[derive(InputObject)]
pub struct IndividualEntryInput {
    /// "grade_class_num last_name first_name" free text.
    pub student_name: String,
    pub result: Option<String>,
    pub score: Option<String>,
    pub rank: Option<String>,
}

#[derive(InputObject)]
pub struct SaveResultInput {
    pub club_name: String,
    pub competition_name: Option<String>,
    pub division: Division,
    pub date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Team division only.
    pub members: Option<Vec<String>>,
    pub score: Option<String>,
    pub rank: Option<String>,
    pub opponent: Option<String>,
    pub round: Option<String>,
    /// Individual division only; one stored record per entry.
    pub entries: Option<Vec<IndividualEntryInput>>,
    pub special_prizes: Option<String>,
    pub profile_id: Option<Uuid>,
}

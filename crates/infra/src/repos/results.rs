use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::academic_year::year_window;
use crate::db::Db;
use crate::models::CompetitionResultRow;
use crate::payload::ResultPayload;

/// Club dropdown sentinel meaning "no club filter".
pub const ALL_CLUBS: &str = "全活動";

const RESULT_COLUMNS: &str = "id, profile_id, club_name, competition_name, division, payload, \
     special_prizes, date, end_date, is_signboard_requested, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    pub club_name: Option<String>,
    pub academic_year: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl ResultFilter {
    /// Club equality bind; the dropdown's "all clubs" entry and an absent
    /// value both mean no narrowing.
    pub fn club_param(&self) -> Option<&str> {
        self.club_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CLUBS)
    }

    /// Half-open `[from, to)` bounds on `created_at`. An explicit date range
    /// overrides the academic-year window entirely.
    pub fn time_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let (from_date, to_date) = if self.date_from.is_some() || self.date_to.is_some() {
            (self.date_from, self.date_to)
        } else if let Some(year) = self.academic_year {
            let (start, end) = year_window(year);
            (Some(start), Some(end))
        } else {
            (None, None)
        };
        (
            from_date.map(start_of_day),
            to_date.and_then(|d| d.succ_opt()).map(start_of_day),
        )
    }
}

#[derive(Debug, Clone)]
pub struct NewCompetitionResult {
    pub profile_id: Option<Uuid>,
    pub club_name: String,
    pub competition_name: Option<String>,
    pub payload: ResultPayload,
    pub special_prizes: Option<String>,
    pub date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct ResultRepo {
    pool: Db,
}

impl ResultRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<CompetitionResultRow>> {
        sqlx::query_as::<_, CompetitionResultRow>(&format!(
            "SELECT {RESULT_COLUMNS} FROM competition_results WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Primary narrowing query for the dashboard, newest first.
    pub async fn list(&self, filter: &ResultFilter) -> SqlxResult<Vec<CompetitionResultRow>> {
        let (from, to) = filter.time_bounds();

        // NULL-guarded binds keep this a single prepared statement.
        sqlx::query_as::<_, CompetitionResultRow>(&format!(
            r#"
            SELECT {RESULT_COLUMNS}
            FROM competition_results
            WHERE ($1::text IS NULL OR club_name = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at < $3)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.club_param())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
    }

    /// Insert one result. The division column is derived from the payload,
    /// so the discriminator always agrees with the stored shape.
    pub async fn create(&self, data: NewCompetitionResult) -> SqlxResult<CompetitionResultRow> {
        let division = data.payload.division();
        sqlx::query_as::<_, CompetitionResultRow>(&format!(
            r#"
            INSERT INTO competition_results
                (profile_id, club_name, competition_name, division, payload, special_prizes, date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RESULT_COLUMNS}
            "#
        ))
        .bind(data.profile_id)
        .bind(data.club_name)
        .bind(data.competition_name)
        .bind(division.as_str())
        .bind(Json(data.payload))
        .bind(data.special_prizes)
        .bind(data.date)
        .bind(data.end_date)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn set_signboard_requested(&self, id: Uuid) -> SqlxResult<bool> {
        let result =
            sqlx::query("UPDATE competition_results SET is_signboard_requested = true, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

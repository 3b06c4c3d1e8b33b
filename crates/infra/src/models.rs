use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::membership::ClubSlots;
use crate::payload::ResultPayload;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StudentRow {
    pub id: Uuid,
    /// Free-text grade/class label, e.g. "2-1-15".
    pub grade_class_num: String,
    pub last_name: String,
    pub first_name: String,
    pub last_kana: Option<String>,
    pub first_kana: Option<String>,
    /// Primary club; blank when unassigned (NOT NULL column).
    pub club_name: String,
    /// Secondary club for students in two clubs.
    pub club_name_2: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentRow {
    pub fn club_slots(&self) -> ClubSlots {
        ClubSlots::from_columns(&self.club_name, self.club_name_2.as_deref())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompetitionResultRow {
    pub id: Uuid,
    pub profile_id: Option<Uuid>,
    pub club_name: String,
    pub competition_name: Option<String>,
    /// Always agrees with the payload tag; the insert path derives it.
    pub division: String,
    pub payload: Json<ResultPayload>,
    pub special_prizes: Option<String>,
    /// Competition (start) date; display falls back to `created_at`.
    pub date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_signboard_requested: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompetitionResultRow {
    pub fn payload(&self) -> &ResultPayload {
        &self.payload.0
    }

    /// Date shown in listings and exports.
    pub fn display_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| self.created_at.date_naive())
    }

    /// Multi-day competitions without an explicit end date end on their
    /// start date.
    pub fn effective_end_date(&self) -> Option<NaiveDate> {
        self.end_date.or(self.date)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfileRow {
    pub id: Uuid,
    /// Club this adviser currently manages; drives the student sidebar.
    pub assigned_club: Option<String>,
    pub is_signboard_manager: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::UserProfileRow;

const PROFILE_COLUMNS: &str = "id, assigned_club, is_signboard_manager, created_at, updated_at";

#[derive(Clone)]
pub struct ProfileRepo {
    pool: Db,
}

impl ProfileRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<UserProfileRow>> {
        sqlx::query_as::<_, UserProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_assigned_club(&self, id: Uuid, club: &str) -> SqlxResult<bool> {
        let result = sqlx::query(
            "UPDATE user_profiles SET assigned_club = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(club)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recipients of signboard request notifications.
    pub async fn signboard_manager_ids(&self) -> SqlxResult<Vec<Uuid>> {
        sqlx::query_scalar("SELECT id FROM user_profiles WHERE is_signboard_manager = true")
            .fetch_all(&self.pool)
            .await
    }

    /// Distinct club names across both membership slots, for the dropdowns.
    pub async fn unique_club_names(&self) -> SqlxResult<Vec<String>> {
        sqlx::query_scalar(
            r#"
            SELECT DISTINCT club_name AS name FROM students WHERE club_name <> ''
            UNION
            SELECT DISTINCT club_name_2 FROM students WHERE club_name_2 IS NOT NULL AND club_name_2 <> ''
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

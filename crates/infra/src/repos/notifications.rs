use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::db::Db;
use crate::models::NotificationRow;

const NOTIFICATION_COLUMNS: &str = "id, user_id, message, is_read, created_at";

/// Message shown to signboard managers when a club requests a signboard.
pub fn signboard_request_message(club_name: &str, competition_name: &str) -> String {
    format!("【看板依頼】{club_name}から{competition_name}の看板製作依頼が届きました。")
}

#[derive(Clone)]
pub struct NotificationRepo {
    pool: Db,
}

impl NotificationRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn unread_for_user(&self, user_id: Uuid) -> SqlxResult<Vec<NotificationRow>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE user_id = $1 AND is_read = false
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Recipient-guarded: a user can only mark their own notifications.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> SqlxResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One unread notification per recipient, same message.
    pub async fn create_many(&self, user_ids: &[Uuid], message: &str) -> SqlxResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, message, is_read)
            SELECT recipient, $2, false
            FROM UNNEST($1::uuid[]) AS t(recipient)
            "#,
        )
        .bind(user_ids.to_vec())
        .bind(message)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signboard_message_embeds_club_and_competition() {
        assert_eq!(
            signboard_request_message("卓球部", "県大会"),
            "【看板依頼】卓球部から県大会の看板製作依頼が届きました。"
        );
    }
}

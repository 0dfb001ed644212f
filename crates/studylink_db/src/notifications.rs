// --- File: crates/studylink_db/src/notifications.rs ---

use crate::error::DbError;
use crate::models::{from_millis, to_millis, Notification, NotificationKind};
use crate::Store;
use sqlx::any::AnyRow;
use sqlx::Row;

impl Store {
    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, message, related_user_id,
                                        session_id, is_read, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.message)
        .bind(&notification.related_user_id)
        .bind(&notification.session_id)
        .bind(notification.read as i64)
        .bind(to_millis(notification.created_at))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn find_notification(&self, id: &str) -> Result<Option<Notification>, DbError> {
        let row = sqlx::query("SELECT * FROM notifications WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| decode_notification(&r)).transpose()
    }

    /// Flip the read flag. Idempotent by construction.
    pub async fn mark_notification_read(&self, id: &str) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    /// All notifications for a user, newest first. A finite listing;
    /// the live stream is layered on top by the realtime gateway.
    pub async fn notifications_for(&self, user_id: &str) -> Result<Vec<Notification>, DbError> {
        let rows = sqlx::query(
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(decode_notification).collect()
    }

    /// Whether a session reminder was already created for this
    /// (participant, session) pair. Defensive dedup for the scheduler:
    /// closes the crash-between-insert-and-flag window. Reminders are
    /// the only session-kind notifications without an acting user
    /// (invites carry the creator), so the check keys on that rather
    /// than on message wording.
    pub async fn reminder_exists(&self, user_id: &str, session_id: &str) -> Result<bool, DbError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS found FROM notifications
             WHERE user_id = ? AND session_id = ? AND kind = 'session'
               AND related_user_id IS NULL",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_one(self.pool())
        .await?;
        Ok(row.try_get::<i64, _>("found")? > 0)
    }
}

fn decode_notification(row: &AnyRow) -> Result<Notification, DbError> {
    let kind_raw: String = row.try_get("kind")?;
    let kind = NotificationKind::parse(&kind_raw)
        .ok_or_else(|| DbError::QueryError(format!("unknown notification kind: {}", kind_raw)))?;
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind,
        message: row.try_get("message")?,
        related_user_id: row.try_get("related_user_id")?,
        session_id: row.try_get("session_id")?,
        read: row.try_get::<i64, _>("is_read")? != 0,
        created_at: from_millis(row.try_get("created_at")?),
    })
}

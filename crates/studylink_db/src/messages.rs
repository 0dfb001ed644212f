// --- File: crates/studylink_db/src/messages.rs ---
//! Message ledger queries. The unread-count view is computed fresh on
//! every call from this ledger; there is deliberately no stored counter
//! that could drift from it.

use crate::error::DbError;
use crate::models::{from_millis, to_millis, ConversationSummary, FileRef, Message, UnreadCount};
use crate::Store;
use sqlx::any::AnyRow;
use sqlx::Row;

impl Store {
    pub async fn insert_message(&self, message: &Message) -> Result<(), DbError> {
        let (file_url, file_name, file_mime) = match &message.file {
            Some(f) => (Some(f.url.clone()), f.name.clone(), f.mime_type.clone()),
            None => (None, None, None),
        };
        sqlx::query(
            "INSERT INTO messages (id, sender_id, recipient_id, body, file_url, file_name,
                                   file_mime, is_read, is_edited, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.sender_id)
        .bind(&message.recipient_id)
        .bind(&message.body)
        .bind(file_url)
        .bind(file_name)
        .bind(file_mime)
        .bind(message.read as i64)
        .bind(message.edited as i64)
        .bind(to_millis(message.created_at))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn find_message(&self, id: &str) -> Result<Option<Message>, DbError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| decode_message(&r)).transpose()
    }

    /// Both directions of the conversation between two users, ordered by
    /// `created_at`. Fetch order is explicit: push-arrival order and
    /// durable order can diverge under reconnect.
    pub async fn thread_between(&self, a: &str, b: &str) -> Result<Vec<Message>, DbError> {
        let rows = sqlx::query(
            "SELECT * FROM messages
             WHERE (sender_id = ? AND recipient_id = ?)
                OR (sender_id = ? AND recipient_id = ?)
             ORDER BY created_at ASC",
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(decode_message).collect()
    }

    /// Bulk-transition all unread messages from `other_user_id` to
    /// `reader_id` to read. Idempotent; returns how many rows flipped.
    pub async fn mark_thread_read(
        &self,
        reader_id: &str,
        other_user_id: &str,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = 1
             WHERE sender_id = ? AND recipient_id = ? AND is_read = 0",
        )
        .bind(other_user_id)
        .bind(reader_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn update_message_body(&self, id: &str, new_body: &str) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE messages SET body = ?, is_edited = 1 WHERE id = ?")
            .bind(new_body)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    /// Hard delete; no tombstone.
    pub async fn delete_message(&self, id: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    /// Unread messages for `user_id`, grouped by sender, with the
    /// sender's display name denormalized in.
    pub async fn unread_counts(&self, user_id: &str) -> Result<Vec<UnreadCount>, DbError> {
        let rows = sqlx::query(
            "SELECT m.sender_id AS sender_id, u.name AS sender_name, COUNT(*) AS unread
             FROM messages m
             JOIN users u ON u.id = m.sender_id
             WHERE m.recipient_id = ? AND m.is_read = 0
             GROUP BY m.sender_id, u.name
             ORDER BY unread DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter()
            .map(|row| {
                Ok(UnreadCount {
                    sender_id: row.try_get("sender_id")?,
                    sender_name: row.try_get("sender_name")?,
                    count: row.try_get("unread")?,
                })
            })
            .collect()
    }

    /// The latest inbound message per sender, newest first.
    pub async fn recent_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, DbError> {
        let rows = sqlx::query(
            "SELECT m.sender_id AS sender_id, u.name AS sender_name,
                    m.body AS body, m.created_at AS created_at
             FROM messages m
             JOIN users u ON u.id = m.sender_id
             WHERE m.recipient_id = ?
               AND m.created_at = (
                   SELECT MAX(m2.created_at) FROM messages m2
                   WHERE m2.sender_id = m.sender_id AND m2.recipient_id = m.recipient_id
               )
             ORDER BY m.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter()
            .map(|row| {
                Ok(ConversationSummary {
                    sender_id: row.try_get("sender_id")?,
                    sender_name: row.try_get("sender_name")?,
                    body: row.try_get("body")?,
                    created_at: from_millis(row.try_get("created_at")?),
                })
            })
            .collect()
    }
}

fn decode_message(row: &AnyRow) -> Result<Message, DbError> {
    let file_url: Option<String> = row.try_get("file_url")?;
    let file = file_url.map(|url| -> Result<FileRef, DbError> {
        Ok(FileRef {
            url,
            name: row.try_get("file_name")?,
            mime_type: row.try_get("file_mime")?,
        })
    });
    Ok(Message {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        recipient_id: row.try_get("recipient_id")?,
        body: row.try_get("body")?,
        file: file.transpose()?,
        read: row.try_get::<i64, _>("is_read")? != 0,
        edited: row.try_get::<i64, _>("is_edited")? != 0,
        created_at: from_millis(row.try_get("created_at")?),
    })
}

// --- File: crates/studylink_db/src/sessions.rs ---
//! Study-session queries, including the reminder scheduler's scan.

use crate::error::DbError;
use crate::models::{from_millis, to_millis, StudySession};
use crate::Store;
use chrono::{DateTime, Duration, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;

impl Store {
    pub async fn insert_session(&self, session: &StudySession) -> Result<(), DbError> {
        let participants = serde_json::to_string(&session.participants)
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        sqlx::query(
            "INSERT INTO study_sessions (id, title, description, start_time, end_time,
                                         location, participants, created_by, reminder_sent,
                                         created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.title)
        .bind(&session.description)
        .bind(to_millis(session.start_time))
        .bind(to_millis(session.end_time))
        .bind(&session.location)
        .bind(participants)
        .bind(&session.created_by)
        .bind(session.reminder_sent as i64)
        .bind(to_millis(session.created_at))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn find_session(&self, id: &str) -> Result<Option<StudySession>, DbError> {
        let row = sqlx::query("SELECT * FROM study_sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| decode_session(&r)).transpose()
    }

    /// Sessions the user participates in, soonest first.
    /// Participants are a JSON array of quoted ids, so a LIKE on the
    /// quoted id is an exact membership test.
    pub async fn sessions_for_participant(
        &self,
        user_id: &str,
    ) -> Result<Vec<StudySession>, DbError> {
        let rows = sqlx::query(
            "SELECT * FROM study_sessions WHERE participants LIKE ? ORDER BY start_time ASC",
        )
        .bind(participant_pattern(user_id))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(decode_session).collect()
    }

    /// Sessions the user participates in that start within the next 24 hours.
    pub async fn upcoming_sessions_for(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<StudySession>, DbError> {
        let rows = sqlx::query(
            "SELECT * FROM study_sessions
             WHERE participants LIKE ? AND start_time >= ? AND start_time <= ?
             ORDER BY start_time ASC",
        )
        .bind(participant_pattern(user_id))
        .bind(to_millis(now))
        .bind(to_millis(now + Duration::hours(24)))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(decode_session).collect()
    }

    /// Sessions starting inside the reminder window that have not been
    /// reminded yet. The scheduler acts on each result at most once.
    pub async fn due_for_reminder(
        &self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Vec<StudySession>, DbError> {
        let rows = sqlx::query(
            "SELECT * FROM study_sessions
             WHERE reminder_sent = 0 AND start_time >= ? AND start_time <= ?
             ORDER BY start_time ASC",
        )
        .bind(to_millis(now))
        .bind(to_millis(now + window))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(decode_session).collect()
    }

    /// One-way transition; there is no path back to unsent.
    pub async fn mark_reminder_sent(&self, id: &str) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE study_sessions SET reminder_sent = 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    /// Update the editable fields. `reminder_sent` is deliberately not
    /// touched: an edited start time does not re-arm the reminder.
    pub async fn update_session(&self, session: &StudySession) -> Result<u64, DbError> {
        let participants = serde_json::to_string(&session.participants)
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        let result = sqlx::query(
            "UPDATE study_sessions
             SET title = ?, description = ?, start_time = ?, end_time = ?,
                 location = ?, participants = ?
             WHERE id = ?",
        )
        .bind(&session.title)
        .bind(&session.description)
        .bind(to_millis(session.start_time))
        .bind(to_millis(session.end_time))
        .bind(&session.location)
        .bind(participants)
        .bind(&session.id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_session(&self, id: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM study_sessions WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}

fn participant_pattern(user_id: &str) -> String {
    format!("%\"{}\"%", user_id)
}

fn decode_session(row: &AnyRow) -> Result<StudySession, DbError> {
    let participants: Vec<String> =
        serde_json::from_str(&row.try_get::<String, _>("participants")?)
            .map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(StudySession {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        start_time: from_millis(row.try_get("start_time")?),
        end_time: from_millis(row.try_get("end_time")?),
        location: row.try_get("location")?,
        participants,
        created_by: row.try_get("created_by")?,
        reminder_sent: row.try_get::<i64, _>("reminder_sent")? != 0,
        created_at: from_millis(row.try_get("created_at")?),
    })
}

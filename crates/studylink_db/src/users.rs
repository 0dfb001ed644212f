// --- File: crates/studylink_db/src/users.rs ---
//! User records. Profile CRUD and search live outside this service; the
//! store only needs enough of the user table to anchor foreign keys and
//! denormalize display names.

use crate::error::DbError;
use crate::models::{from_millis, to_millis, Subject, User};
use crate::Store;
use sqlx::any::AnyRow;
use sqlx::Row;

impl Store {
    pub async fn insert_user(&self, user: &User) -> Result<(), DbError> {
        let subjects = serde_json::to_string(&user.subjects)
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        let availability = serde_json::to_string(&user.availability)
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, university, bio, location,
                                subjects, availability, avatar, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.university)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(subjects)
        .bind(availability)
        .bind(&user.avatar)
        .bind(to_millis(user.created_at))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn find_user(&self, id: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| decode_user(&r)).transpose()
    }

    /// Display name lookup, used when denormalizing actor names into
    /// push payloads and unread summaries.
    pub async fn user_name(&self, id: &str) -> Result<Option<String>, DbError> {
        let row = sqlx::query("SELECT name FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| r.try_get::<String, _>("name").map_err(DbError::from))
            .transpose()
    }
}

fn decode_user(row: &AnyRow) -> Result<User, DbError> {
    let subjects: Vec<Subject> = serde_json::from_str(&row.try_get::<String, _>("subjects")?)
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    let availability: Vec<String> = serde_json::from_str(&row.try_get::<String, _>("availability")?)
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        university: row.try_get("university")?,
        bio: row.try_get("bio")?,
        location: row.try_get("location")?,
        subjects,
        availability,
        avatar: row.try_get("avatar")?,
        created_at: from_millis(row.try_get("created_at")?),
    })
}

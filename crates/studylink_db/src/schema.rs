// --- File: crates/studylink_db/src/schema.rs ---
//! Schema statements, executed in order by [`crate::Store::migrate`].
//!
//! Portable column types only: TEXT and INTEGER (unix-millisecond
//! timestamps, 0/1 flags). List-valued attributes (subjects,
//! availability, participants) are JSON text.

pub(crate) const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id            TEXT PRIMARY KEY,
        name          TEXT NOT NULL,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        university    TEXT NOT NULL,
        bio           TEXT,
        location      TEXT,
        subjects      TEXT NOT NULL DEFAULT '[]',
        availability  TEXT NOT NULL DEFAULT '[]',
        avatar        TEXT,
        created_at    INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS messages (
        id            TEXT PRIMARY KEY,
        sender_id     TEXT NOT NULL REFERENCES users(id),
        recipient_id  TEXT NOT NULL REFERENCES users(id),
        body          TEXT,
        file_url      TEXT,
        file_name     TEXT,
        file_mime     TEXT,
        is_read       INTEGER NOT NULL DEFAULT 0,
        is_edited     INTEGER NOT NULL DEFAULT 0,
        created_at    INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_messages_recipient_unread
        ON messages (recipient_id, is_read)",
    "CREATE INDEX IF NOT EXISTS idx_messages_thread
        ON messages (sender_id, recipient_id, created_at)",
    "CREATE TABLE IF NOT EXISTS notifications (
        id              TEXT PRIMARY KEY,
        user_id         TEXT NOT NULL REFERENCES users(id),
        kind            TEXT NOT NULL,
        message         TEXT NOT NULL,
        related_user_id TEXT,
        session_id      TEXT,
        is_read         INTEGER NOT NULL DEFAULT 0,
        created_at      INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_notifications_user
        ON notifications (user_id, created_at)",
    "CREATE TABLE IF NOT EXISTS study_sessions (
        id            TEXT PRIMARY KEY,
        title         TEXT NOT NULL,
        description   TEXT,
        start_time    INTEGER NOT NULL,
        end_time      INTEGER NOT NULL,
        location      TEXT,
        participants  TEXT NOT NULL DEFAULT '[]',
        created_by    TEXT NOT NULL REFERENCES users(id),
        reminder_sent INTEGER NOT NULL DEFAULT 0,
        created_at    INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_sessions_reminder
        ON study_sessions (reminder_sent, start_time)",
];

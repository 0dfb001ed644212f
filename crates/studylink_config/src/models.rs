// --- File: crates/studylink_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite:data/studylink.db, loaded via STUDYLINK__DATABASE__URL
}

// --- Auth Config ---
// Holds the HS256 signing secret for bearer tokens. Loaded via
// STUDYLINK__AUTH__JWT_SECRET; never checked into a config file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

fn default_token_ttl_secs() -> i64 {
    86_400
}

// --- Realtime Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RealtimeConfig {
    /// Interval between server heartbeat pings on a live channel.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

fn default_heartbeat_secs() -> u64 {
    30
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

// --- Reminder Scheduler Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReminderConfig {
    /// Seconds between scheduler ticks.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// Tolerance window: sessions starting within this many minutes are "starting soon".
    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,
}

fn default_tick_secs() -> u64 {
    60
}

fn default_window_minutes() -> i64 {
    10
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
            window_minutes: default_window_minutes(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server, database and auth config are mandatory
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,

    // --- Optional sections with sensible defaults ---
    #[serde(default)]
    pub realtime: RealtimeConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
}

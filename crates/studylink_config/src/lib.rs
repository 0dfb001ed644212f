pub mod models;

pub use models::*;

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;

static DOTENV: OnceCell<()> = OnceCell::new();

/// Load `.env` into the process environment exactly once.
/// Dependent crates call this so they do not care whether the binary did.
pub fn ensure_dotenv_loaded() {
    DOTENV.get_or_init(|| {
        // Missing .env is fine; env vars may come from the real environment.
        let _ = dotenv::dotenv();
    });
}

/// Loads the application configuration.
///
/// Layering, lowest priority first: built-in defaults, `config/default.*`,
/// `config/{RUN_MODE}.*`, then `STUDYLINK__`-prefixed environment variables
/// (e.g. `STUDYLINK__AUTH__JWT_SECRET`, `STUDYLINK__DATABASE__URL`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "default".into());

    Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5000)?
        .set_default("database.url", "sqlite:data/studylink.db")?
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
        .add_source(Environment::with_prefix("STUDYLINK").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sections_get_defaults() {
        let raw = serde_json::json!({
            "server": { "host": "127.0.0.1", "port": 5000 },
            "database": { "url": "sqlite::memory:" },
            "auth": { "jwt_secret": "test-secret" },
        });
        let config: AppConfig = serde_json::from_value(raw).expect("config should deserialize");
        assert_eq!(config.auth.token_ttl_secs, 86_400);
        assert_eq!(config.realtime.heartbeat_secs, 30);
        assert_eq!(config.reminder.tick_secs, 60);
        assert_eq!(config.reminder.window_minutes, 10);
    }
}

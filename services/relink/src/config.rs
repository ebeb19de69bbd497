use tracing::Level;

/// Default backend, overridable at runtime through `RELINK_WS_URL`.
const DEFAULT_WS_URL: &str = "wss://relink-backend1.onrender.com/ws";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub ws_base: String,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let ws_base = std::env::var("RELINK_WS_URL").unwrap_or_else(|_| DEFAULT_WS_URL.to_string());
        if !(ws_base.starts_with("ws://") || ws_base.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue(
                "RELINK_WS_URL".to_string(),
                format!("'{}' is not a ws:// or wss:// URL", ws_base),
            ));
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self { ws_base, log_level })
    }
}

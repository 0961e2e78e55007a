use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrackingConfig {
    /// Initial baggage location when the flight record carries no origin.
    #[serde(default = "default_location")]
    pub default_location: String,
    /// Bound on the dashboard recent-activity feed.
    #[serde(default = "default_recent_limit")]
    pub recent_activity_limit: usize,
}

fn default_location() -> String {
    "Check-in Desk".to_string()
}

fn default_recent_limit() -> usize {
    10
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `BAGTRACE__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("BAGTRACE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

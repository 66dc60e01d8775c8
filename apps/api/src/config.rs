use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every key has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// When set, records are kept in Postgres; otherwise in process memory.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub seed_demo_data: bool,
    pub simulated_delay: Duration,
    pub event_channel_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            seed_demo_data: parse_env("SEED_DEMO_DATA", true)
                .context("SEED_DEMO_DATA must be true or false")?,
            simulated_delay: Duration::from_millis(
                parse_env("SIMULATED_DELAY_MS", 1500)
                    .context("SIMULATED_DELAY_MS must be a number of milliseconds")?,
            ),
            event_channel_capacity: parse_env("EVENT_CHANNEL_CAPACITY", 256)
                .context("EVENT_CHANNEL_CAPACITY must be a positive integer")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            seed_demo_data: true,
            simulated_delay: Duration::from_millis(1500),
            event_channel_capacity: 256,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for environment variable '{key}': {raw}")),
        Err(_) => Ok(default),
    }
}

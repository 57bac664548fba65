use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::consts::{
    DEFAULT_API_PORT, DEFAULT_DATABASE_URL, DEFAULT_PROXY_URL, DEFAULT_QUIZ_ROUND_DELAY_MS,
    DEFAULT_UPSTREAM_URL,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub proxy_url: String,
    pub database_url: String,
    pub quiz_round_delay: Duration,
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", DEFAULT_API_PORT),
            upstream_url: try_load("UPSTREAM_URL", DEFAULT_UPSTREAM_URL.to_string()),
            proxy_url: try_load("PROXY_URL", DEFAULT_PROXY_URL.to_string()),
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL.to_string()),
            quiz_round_delay: Duration::from_millis(try_load(
                "QUIZ_ROUND_DELAY_MS",
                DEFAULT_QUIZ_ROUND_DELAY_MS,
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_API_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            quiz_round_delay: Duration::from_millis(DEFAULT_QUIZ_ROUND_DELAY_MS),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_or(key, env::var(key).ok(), default)
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = raw else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}

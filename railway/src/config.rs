use std::str::FromStr;

use anyhow::Context;

use reservation::DEFAULT_MAX_CODE_ATTEMPTS;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite connection string, e.g. `sqlite://railway.db`.
    pub database_url: String,

    /// Pool size. The default of one connection serializes every booking
    /// and cancellation on a single storage handle.
    pub max_connections: u32,

    /// Collision retries when minting a reservation code.
    pub max_code_attempts: u32,

    /// Load the sample timetable into an empty database on start.
    pub seed_sample_trains: bool,

    /// JSON log lines instead of pretty output.
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://railway.db".to_string(),
            max_connections: 1,
            max_code_attempts: DEFAULT_MAX_CODE_ATTEMPTS,
            seed_sample_trains: true,
            json_logs: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys fall back to the
    /// defaults; set but unparsable keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let d = Self::default();

        let max_connections = parse_or("RAILWAY_MAX_CONNECTIONS", &lookup, d.max_connections)?;
        anyhow::ensure!(max_connections > 0, "RAILWAY_MAX_CONNECTIONS must be at least 1");

        let max_code_attempts = parse_or("RAILWAY_CODE_ATTEMPTS", &lookup, d.max_code_attempts)?;
        anyhow::ensure!(max_code_attempts > 0, "RAILWAY_CODE_ATTEMPTS must be at least 1");

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(d.database_url),
            max_connections,
            max_code_attempts,
            seed_sample_trains: parse_or(
                "RAILWAY_SEED_SAMPLE_TRAINS",
                &lookup,
                d.seed_sample_trains,
            )?,
            json_logs: lookup("APP_ENV").is_some_and(|v| v == "production"),
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

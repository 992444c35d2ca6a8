use std::path::PathBuf;
use std::str::FromStr;

use crate::stats::{StatsBackend, StatsError};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `STATS_BACKEND`: `query` (default) or `views`
    pub backend: StatsBackend,
    /// `DATABASE_URL`: PostgreSQL connection string; in-memory data when unset
    pub database_url: Option<String>,
    /// `F1STATS_SNAPSHOT`: JSON snapshot loaded into the in-memory store
    pub snapshot_path: Option<PathBuf>,
    /// `BIND_ADDR`
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, StatsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StatsError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend = match get("STATS_BACKEND") {
            Some(raw) => StatsBackend::from_str(raw.trim()).map_err(|_| {
                StatsError::Configuration(format!(
                    "STATS_BACKEND must be 'query' or 'views', got '{}'",
                    raw
                ))
            })?,
            None => StatsBackend::default(),
        };

        Ok(Self {
            backend,
            database_url: get("DATABASE_URL"),
            snapshot_path: get("F1STATS_SNAPSHOT").map(PathBuf::from),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

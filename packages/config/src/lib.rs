// ABOUTME: Runtime configuration for Bookmarker, read from the environment
// ABOUTME: Storage paths, pool sizing, export directory, sync cadence, and log filter

pub mod constants;
pub mod logging;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub use logging::init_tracing;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    MustBePositive { name: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub export_dir: PathBuf,
    pub db_max_connections: u32,
    pub db_busy_timeout_seconds: u64,
    pub sync_interval_minutes: u64,
    pub log_filter: Option<String>,
}

impl Config {
    /// Load a `.env` file if present, then read the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(constants::BOOKMARKER_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(bookmarker_core::bookmarker_dir);

        let database_path = lookup(constants::BOOKMARKER_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("bookmarker.db"));

        let export_dir = lookup(constants::BOOKMARKER_EXPORT_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("exports"));

        let db_max_connections =
            parse_positive(&lookup, constants::BOOKMARKER_DB_MAX_CONNECTIONS, 5u32)?;
        let db_busy_timeout_seconds =
            parse_positive(&lookup, constants::BOOKMARKER_DB_BUSY_TIMEOUT_SECS, 30u64)?;
        let sync_interval_minutes =
            parse_positive(&lookup, constants::BOOKMARKER_SYNC_INTERVAL_MINUTES, 30u64)?;

        let log_filter = lookup(constants::BOOKMARKER_LOG).or_else(|| lookup(constants::RUST_LOG));

        Ok(Config {
            data_dir,
            database_path,
            export_dir,
            db_max_connections,
            db_busy_timeout_seconds,
            sync_interval_minutes,
            log_filter,
        })
    }
}

fn parse_positive<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
{
    let value = match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw })?,
        None => return Ok(default),
    };

    if value <= T::default() {
        return Err(ConfigError::MustBePositive { name });
    }

    Ok(value)
}

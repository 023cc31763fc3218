//! Runtime configuration read from the environment (and `.env` when present).

use crate::error::MarketError;
use crate::query::PageLimits;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: PathBuf,
    pub page_limits: PageLimits,
    /// How many listings the "latest" endpoint returns
    pub latest_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            database_path: PathBuf::from("data/krishi_setu.sled"),
            page_limits: PageLimits::default(),
            latest_limit: 6,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, var: &str, fallback: T) -> Result<T, MarketError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(fallback),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| MarketError::Config(format!("Invalid {var} '{raw}': {e}"))),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, MarketError> {
        dotenv().ok(); // Load .env file if present

        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the config from an arbitrary variable source. Unset variables keep
    /// their defaults; set but unparsable ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MarketError> {
        let defaults = Self::default();

        let server_host = lookup("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = parse_or(&lookup, "SERVER_PORT", defaults.server_port)?;
        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);
        let default_size = parse_or(
            &lookup,
            "DEFAULT_PAGE_SIZE",
            defaults.page_limits.default_size,
        )?;
        let max_size = parse_or(&lookup, "MAX_PAGE_SIZE", defaults.page_limits.max_size)?;
        let latest_limit = parse_or(&lookup, "LATEST_LIMIT", defaults.latest_limit)?;

        if default_size == 0 || max_size < default_size {
            return Err(MarketError::Config(format!(
                "page sizes must satisfy 0 < DEFAULT_PAGE_SIZE ({default_size}) <= MAX_PAGE_SIZE ({max_size})"
            )));
        }

        tracing::info!("Application configuration loaded successfully.");

        Ok(Self {
            server_host,
            server_port,
            database_path,
            page_limits: PageLimits {
                default_size,
                max_size,
            },
            latest_limit,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

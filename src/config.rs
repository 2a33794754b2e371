//! Runtime configuration from environment variables (`.env` is honored).

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    Postgres,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_type: DbType,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Requests per minute per client IP; `0` turns the limiter off
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    /// Request body cap, which bounds CSV uploads
    pub max_upload_bytes: usize,
    pub db_connect_max_elapsed: Duration,
    /// How long a cached list is served before it is re-read
    pub cache_ttl: Duration,
}

const DEFAULT_SQLITE_URL: &str = "sqlite:./venturehub.sqlite?mode=rwc";

impl Default for Config {
    fn default() -> Self {
        Self {
            db_type: DbType::Sqlite,
            database_url: DEFAULT_SQLITE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            rate_limit_per_minute: 60,
            rate_limit_burst: 10,
            max_upload_bytes: 5 * 1024 * 1024,
            db_connect_max_elapsed: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let db_type = match env::var("DB_TYPE").ok().as_deref().map(str::trim) {
            None | Some("") | Some("sqlite") => DbType::Sqlite,
            Some("postgres") => DbType::Postgres,
            Some(other) => bail!("DB_TYPE must be 'postgres' or 'sqlite', got '{}'", other),
        };

        let database_url = match (db_type, env::var("DATABASE_URL").ok()) {
            (_, Some(url)) if !url.trim().is_empty() => url,
            (DbType::Postgres, _) => bail!("DATABASE_URL must be set for Postgres"),
            (DbType::Sqlite, _) => defaults.database_url,
        };

        Ok(Self {
            db_type,
            database_url,
            bind_addr: parse_var("BIND_ADDR", defaults.bind_addr)?,
            rate_limit_per_minute: parse_var("RATE_LIMIT_PER_MINUTE", defaults.rate_limit_per_minute)?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            db_connect_max_elapsed: Duration::from_secs(parse_var(
                "DB_CONNECT_MAX_ELAPSED_SECS",
                defaults.db_connect_max_elapsed.as_secs(),
            )?),
            cache_ttl: Duration::from_secs(parse_var("CACHE_TTL_SECS", defaults.cache_ttl.as_secs())?),
        })
    }

    /// In-memory SQLite with the rate limiter off.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            rate_limit_per_minute: 0,
            ..Self::default()
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: '{}'", name, raw)),
        _ => Ok(default),
    }
}

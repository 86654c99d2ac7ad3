//! Runtime configuration read from the environment (after `.env` is loaded).

use std::{str::FromStr, time::Duration};

#[cfg(test)]
use std::collections::HashMap;

use anyhow::{Context, Result};

pub const DEFAULT_PUSH_API_URL: &str = "https://exp.host/--/api/v2/push/send";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_pool_size: u32,
    /// How long a login token stays valid.
    pub session_ttl: Duration,
    /// `*` allows any origin.
    pub cors_origin: String,
    pub rate_limit: RateLimitConfig,
    pub push: PushConfig,
    /// Bearer key for the admin scope; admin routes are closed when unset.
    pub admin_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConfig {
    pub enabled: bool,
    pub api_url: String,
    pub access_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[cfg(test)]
    pub fn from_map(vars: &HashMap<&str, &str>) -> Result<Self> {
        Self::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL not found")?;

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            db_pool_size: parse_or(&lookup, "DB_POOL_SIZE", 10)?,
            session_ttl: Duration::from_secs(parse_or(&lookup, "SESSION_TTL_SECS", 7 * 24 * 3600)?),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| "*".to_string()),
            rate_limit: RateLimitConfig {
                window: Duration::from_millis(parse_or(&lookup, "RATE_LIMIT_WINDOW_MS", 15 * 60 * 1000)?),
                max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", 100)?,
            },
            push: PushConfig {
                enabled: parse_or(&lookup, "PUSH_ENABLED", true)?,
                api_url: lookup("PUSH_API_URL").unwrap_or_else(|| DEFAULT_PUSH_API_URL.to_string()),
                access_token: lookup("PUSH_ACCESS_TOKEN").filter(|t| !t.is_empty()),
            },
            admin_api_key: lookup("ADMIN_API_KEY").filter(|k| !k.is_empty()),
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::matching::engine::LimitMode;

/// Application configuration loaded from environment variables.
/// Startup fails if `DATABASE_URL` is missing or any value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub db_max_connections: u32,
    /// Attempts per store query, including the first one.
    pub db_max_retries: u32,
    /// Base delay before the first retry; doubled on every further attempt.
    pub db_retry_delay_ms: u64,
    pub match_limit_mode: LimitMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            db_max_retries: parse_env("DB_MAX_RETRIES", 3)?,
            db_retry_delay_ms: parse_env("DB_RETRY_DELAY_MS", 1000)?,
            match_limit_mode: parse_env("MATCH_LIMIT_MODE", LimitMode::PostRanking)?,
        })
    }
}

impl FromStr for LimitMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post_ranking" => Ok(LimitMode::PostRanking),
            "pre_ranking" => Ok(LimitMode::PreRanking),
            other => bail!("expected 'post_ranking' or 'pre_ranking', got '{other}'"),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_mode_parses_both_spellings() {
        assert_eq!(
            "post_ranking".parse::<LimitMode>().unwrap(),
            LimitMode::PostRanking
        );
        assert_eq!(
            " PRE_RANKING ".parse::<LimitMode>().unwrap(),
            LimitMode::PreRanking
        );
    }

    #[test]
    fn test_limit_mode_rejects_unknown() {
        assert!("ranked".parse::<LimitMode>().is_err());
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_parse_value_trims() {
        assert_eq!(parse_value::<u32>("DB_MAX_RETRIES", " 5 ").unwrap(), 5);
    }
}

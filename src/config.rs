use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::bootstrap::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub bootstrap: RetryPolicy,
    /// Insert the default person at startup when it is missing.
    pub seed_default_record: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = RetryPolicy::default();
        Ok(Self {
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 4000)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            bootstrap: RetryPolicy {
                max_attempts: parse_or(&lookup, "BOOTSTRAP_MAX_ATTEMPTS", defaults.max_attempts)?,
                delay: Duration::from_secs(parse_or(
                    &lookup,
                    "BOOTSTRAP_RETRY_DELAY_SECS",
                    defaults.delay.as_secs(),
                )?),
            },
            seed_default_record: parse_flag(&lookup, "SEED_DEFAULT_RECORD")?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", key, raw)),
        None => Ok(default),
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be a boolean, got {:?}", key, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/roster")]).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.acquire_timeout, Duration::from_secs(5));
        assert_eq!(cfg.bootstrap, RetryPolicy::default());
        assert!(!cfg.seed_default_record);
    }

    #[test]
    fn database_url_is_required() {
        let err = config(&[("PORT", "4000")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://db/roster"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("BOOTSTRAP_MAX_ATTEMPTS", "3"),
            ("BOOTSTRAP_RETRY_DELAY_SECS", "0"),
            ("SEED_DEFAULT_RECORD", "TRUE"),
        ])
        .unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.bootstrap.max_attempts, 3);
        assert_eq!(cfg.bootstrap.delay, Duration::ZERO);
        assert!(cfg.seed_default_record);
    }

    #[test]
    fn bad_port_is_reported_by_name() {
        let err = config(&[("DATABASE_URL", "postgres://db/roster"), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn bad_flag_is_rejected() {
        assert!(config(&[("DATABASE_URL", "x"), ("SEED_DEFAULT_RECORD", "maybe")]).is_err());
    }
}

//! Central module for application-wide configuration settings.
//!
//! Settings come from environment variables. Missing values fall back to
//! defaults (logged); malformed values are a startup error.

use roomly_access::RedirectStrategy;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

pub const ADDR_VAR: &str = "ROOMLY_ADDR";
pub const PROFILES_VAR: &str = "ROOMLY_PROFILES";
pub const REDIRECT_STRATEGY_VAR: &str = "ROOMLY_REDIRECT_STRATEGY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub profiles_path: PathBuf,
    pub redirect_strategy: RedirectStrategy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            addr: try_load(&lookup, ADDR_VAR, "127.0.0.1:3000")?,
            profiles_path: try_load(&lookup, PROFILES_VAR, "profiles.json")?,
            redirect_strategy: try_load(&lookup, REDIRECT_STRATEGY_VAR, "substitute")?,
        })
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.profiles_path, PathBuf::from("profiles.json"));
        assert_eq!(config.redirect_strategy, RedirectStrategy::Substitute);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ADDR_VAR, "0.0.0.0:8080"),
            (PROFILES_VAR, "/etc/roomly/profiles.json"),
            (REDIRECT_STRATEGY_VAR, "deferred"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.profiles_path, PathBuf::from("/etc/roomly/profiles.json"));
        assert_eq!(config.redirect_strategy, RedirectStrategy::Deferred);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = Config::from_lookup(lookup(&[(REDIRECT_STRATEGY_VAR, "flash")])).unwrap_err();
        let ConfigError::Invalid { key, value, .. } = err;
        assert_eq!(key, REDIRECT_STRATEGY_VAR);
        assert_eq!(value, "flash");

        assert!(Config::from_lookup(lookup(&[(ADDR_VAR, "localhost")])).is_err());
    }
}

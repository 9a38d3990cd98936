use std::env;

use thiserror::Error;

use crate::feed::DEFAULT_CAPACITY;

/// Default SQLite database file.
pub const DEFAULT_DB_PATH: &str = "carcheck.db";

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got \"{value}\"")]
    InvalidNumber { var: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the SQLite database file (default: "carcheck.db")
    pub db_path: String,
    /// Buffered notifications per live query (default: 64)
    pub change_feed_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CARCHECK_DB_PATH` - SQLite database path (default: "carcheck.db")
    /// - `CARCHECK_CHANGE_FEED_CAPACITY` - Change feed capacity (default: 64)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("CARCHECK_DB_PATH")
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let change_feed_capacity = match lookup("CARCHECK_CHANGE_FEED_CAPACITY") {
            Some(value) => parse_positive("CARCHECK_CHANGE_FEED_CAPACITY", &value)?,
            None => DEFAULT_CAPACITY,
        };

        Ok(Self {
            db_path,
            change_feed_capacity,
        })
    }

    /// Replaces the database path, e.g. from a command-line flag.
    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            change_feed_capacity: DEFAULT_CAPACITY,
        }
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
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
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.db_path, "carcheck.db");
        assert_eq!(config.change_feed_capacity, 64);
    }

    #[test]
    fn test_values_from_variables() {
        let config = Config::from_lookup(lookup(&[
            ("CARCHECK_DB_PATH", "/tmp/inspections.db"),
            ("CARCHECK_CHANGE_FEED_CAPACITY", " 128 "),
        ]))
        .unwrap();

        assert_eq!(config.db_path, "/tmp/inspections.db");
        assert_eq!(config.change_feed_capacity, 128);
    }

    #[test]
    fn test_blank_db_path_uses_default() {
        let config = Config::from_lookup(lookup(&[("CARCHECK_DB_PATH", "  ")])).unwrap();
        assert_eq!(config.db_path, DEFAULT_DB_PATH);
    }

    #[test]
    fn test_invalid_capacity() {
        for value in ["zero", "0", "-4"] {
            let err = Config::from_lookup(lookup(&[("CARCHECK_CHANGE_FEED_CAPACITY", value)]))
                .unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidNumber {
                    var: "CARCHECK_CHANGE_FEED_CAPACITY",
                    value: value.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_with_db_path_overrides() {
        let config = Config::default().with_db_path(":memory:");
        assert_eq!(config.db_path, ":memory:");
    }
}

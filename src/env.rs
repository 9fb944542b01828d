//! Environment variable names used by this crate for convenient
//! configuration of loggers from services.
//!
//! These are purely helpers; [`Config`] itself never reads the
//! environment.

use crate::config::{Config, FormatKind};
use crate::level::Level;

/// Minimum log level, e.g. `debug`.
pub const FIELDLOG_LEVEL_ENV: &str = "FIELDLOG_LEVEL";

/// Output format, `json` or `text`.
pub const FIELDLOG_FORMAT_ENV: &str = "FIELDLOG_FORMAT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Default configuration with level and format taken from
    /// [`FIELDLOG_LEVEL_ENV`] and [`FIELDLOG_FORMAT_ENV`].
    ///
    /// Unset variables keep the defaults; unparsable ones are reported on
    /// the fallback sink and keep the defaults as well.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup(FIELDLOG_LEVEL_ENV) {
            match raw.parse::<Level>() {
                Ok(level) => config.level = level,
                Err(err) => config.warn_default(FIELDLOG_LEVEL_ENV, &err),
            }
        }
        if let Some(raw) = lookup(FIELDLOG_FORMAT_ENV) {
            match raw.parse::<FormatKind>() {
                Ok(format) => config = config.with_format(format),
                Err(err) => config.warn_default(FIELDLOG_FORMAT_ENV, &err),
            }
        }
        config
    }

    fn warn_default(&self, key: &str, err: &dyn std::fmt::Display) {
        let line = format!("fieldlog: ignoring {}: {}\n", key, err);
        let _ = self.fallback.write_line(line.as_bytes());
    }
}

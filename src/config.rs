//! Configuration loading.
//!
//! Settings come from `~/.config/zcalc/config.toml` (or an explicit path),
//! then environment overrides. Every field is optional in the file.
//!
//! ```toml
//! precision = 10
//! prompt = "> "
//! json = false
//!
//! [log]
//! filter = "warn"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculator::DEFAULT_PRECISION;

/// Environment variable overriding `precision`.
pub const PRECISION_ENV: &str = "ZCALC_PRECISION";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum fractional digits shown for results.
    pub precision: usize,
    /// Prompt printed before each line in interactive mode.
    pub prompt: String,
    /// Print each display update as a JSON object.
    pub json: bool,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            prompt: "> ".to_string(),
            json: false,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// The default config file location: `<config dir>/zcalc/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("zcalc").join("config.toml"))
    }

    /// Load configuration from `path`, or from the default location when
    /// `None`, then apply environment overrides.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides looked up through `var`.
    pub fn with_env_overrides<F>(mut self, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var(PRECISION_ENV) {
            self.precision = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: PRECISION_ENV,
                value,
            })?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.precision, 10);
        assert_eq!(config.prompt, "> ");
        assert!(!config.json);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "precision = 4").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.precision, 4);
        assert_eq!(config.prompt, "> ");
    }

    #[test]
    fn test_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "precision = 2\nprompt = \"calc> \"\njson = true\n\n[log]\nfilter = \"debug\""
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.precision, 2);
        assert_eq!(config.prompt, "calc> ");
        assert!(config.json);
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "precision = \"lots\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_env_override() {
        let config = Config::default()
            .with_env_overrides(|name| (name == PRECISION_ENV).then(|| "3".to_string()))
            .unwrap();
        assert_eq!(config.precision, 3);

        let err = Config::default()
            .with_env_overrides(|_| Some("many".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("ZCALC_PRECISION"));
    }
}

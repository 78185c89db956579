//! Startup configuration read from a small TOML file. Every key is optional;
//! a missing file means "use the defaults", which matches running the browser
//! next to a `music.sqlite` file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "MUSIC_BROWSER_CONFIG";
/// Overrides `[storage] db_path`.
pub const DB_ENV: &str = "MUSIC_BROWSER_DB";

const DEFAULT_DB_PATH: &str = "music.sqlite";
const DEFAULT_LOG_LEVEL: &str = "warn";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "music-browser.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config directory is unavailable for this platform; set MUSIC_BROWSER_CONFIG")]
    ConfigDirUnavailable,
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid log level `{level}` in {path}; expected off, error, warn, info, debug or trace")]
    LogLevel { path: PathBuf, level: String },
    #[error("[storage] db_path in {path} cannot be empty")]
    EmptyDbPath { path: PathBuf },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: Storage,
    pub logging: Logging,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Storage {
    pub db_path: PathBuf,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub level: String,
    /// Log destination. Unset means [`default_log_path`]; stderr is never used
    /// because the terminal UI owns the screen.
    pub file: Option<PathBuf>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "music-db-browser")
}

/// `music-browser.log` in the platform data dir, or in the temp dir when the
/// platform has no home directory.
pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(env::temp_dir)
        .join(LOG_FILE_NAME)
}

impl Config {
    /// `$MUSIC_BROWSER_CONFIG`, else `config.toml` in the platform config dir.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = project_dirs().ok_or(ConfigError::ConfigDirUnavailable)?;
        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    /// Decode and validate `raw`; `path` is only used in error messages.
    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.storage.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath {
                path: path.to_path_buf(),
            });
        }
        if LevelFilter::from_str(&config.logging.level).is_err() {
            return Err(ConfigError::LogLevel {
                path: path.to_path_buf(),
                level: config.logging.level,
            });
        }
        Ok(config)
    }

    /// Database to open: the explicit override if any, else the configured path.
    pub fn db_path(&self, override_path: Option<PathBuf>) -> PathBuf {
        override_path.unwrap_or_else(|| self.storage.db_path.clone())
    }

    /// File the logger appends to: the configured one or [`default_log_path`].
    pub fn log_file(&self) -> PathBuf {
        self.logging.file.clone().unwrap_or_else(default_log_path)
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.logging.level).unwrap_or(LevelFilter::Warn)
    }

    /// Commented template printed by `--print-example-config`.
    pub fn example() -> String {
        format!(
            "[storage]\n\
             # SQLite file with artists, albums and songs tables.\n\
             db_path = \"{DEFAULT_DB_PATH}\"\n\
             \n\
             [logging]\n\
             level = \"{DEFAULT_LOG_LEVEL}\"\n\
             # Defaults to {LOG_FILE_NAME} in the platform data directory.\n\
             # file = \"/tmp/{LOG_FILE_NAME}\"\n"
        )
    }
}

//! Options for building a logger.
//!
//! The console sink is enabled unless configured otherwise and the
//! file sink is disabled unless a [`FileSinkOptions`] is supplied.
use crate::{Error, LogLevel, Result};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Size in megabytes that triggers a rotation when
/// `max_size_mb` is zero.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Rotating log file destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkOptions {
    /// Path of the active log file.
    pub path: PathBuf,
    /// Size in megabytes before the file is rotated.
    pub max_size_mb: u64,
    /// Number of rotated files to keep, zero keeps all of them.
    pub max_backups: u64,
    /// Days to keep rotated files, zero disables the age limit.
    pub max_age_days: u64,
    /// Compress rotated files with gzip.
    pub compress: bool,
    /// Minimum level written to the file.
    pub level: LogLevel,
}

impl FileSinkOptions {
    /// Options for a file at `path` using the default limits.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Rotation size with the zero value resolved.
    pub fn rotation_size_mb(&self) -> u64 {
        if self.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size_mb
        }
    }
}

impl Default for FileSinkOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_backups: 0,
            max_age_days: 0,
            compress: false,
            level: LogLevel::Info,
        }
    }
}

/// Standard output destination.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSinkOptions {
    /// Minimum level written to the console.
    pub level: LogLevel,
}

impl ConsoleSinkOptions {
    /// Console options used when none are configured.
    pub fn fallback() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

/// Options passed to the logger factory.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// File sink, disabled when `None`.
    pub file: Option<FileSinkOptions>,
    /// Console sink, a debug level console is used when `None`.
    pub console: Option<ConsoleSinkOptions>,
}

impl LoggerOptions {
    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        content.parse()
    }

    /// Console options with the default substituted.
    pub fn console_or_default(&self) -> ConsoleSinkOptions {
        self.console.unwrap_or_else(ConsoleSinkOptions::fallback)
    }
}

impl FromStr for LoggerOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

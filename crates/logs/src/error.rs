use std::path::PathBuf;
use thiserror::Error;

/// Errors generated by the logs library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when a logger is built without options.
    #[error("logger options are required")]
    MissingOptions,

    /// Error generated when a file sink has an empty path.
    ///
    /// Checked before the rotating writer is created, which
    /// otherwise has no file to write to.
    #[error("file sink requires a path")]
    MissingFilePath,

    /// Error generated when a log file path cannot be split into
    /// a UTF-8 directory and file name.
    #[error("log file path {0} is not valid")]
    InvalidPath(PathBuf),

    /// Error generated when the rotating file writer cannot be created.
    #[error("failed to create rotating log file: {0}")]
    Rotation(String),

    /// Error generated when a global default subscriber
    /// has already been installed.
    #[error("a global default logger is already installed")]
    AlreadyInstalled,

    /// Errors generated by the IO module.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Errors generated parsing TOML options.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

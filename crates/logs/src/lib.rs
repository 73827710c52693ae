#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(all(doc, CHANNEL_NIGHTLY), feature(doc_auto_cfg))]
//! Console and rotating file logging on top of `tracing`.
//!
//! A [`Logger`] fans every event out to a colorized console sink
//! and, optionally, a size rotated log file. Each sink filters
//! records against its own minimum level and every line carries
//! the call site of the log statement.
//!
//! ```no_run
//! use fanlog::{FileSinkOptions, LogLevel, LoggerOptions};
//!
//! # fn main() -> Result<(), fanlog::Error> {
//! let options = LoggerOptions {
//!     file: Some(FileSinkOptions {
//!         level: LogLevel::Warn,
//!         ..FileSinkOptions::new("logs/app.log")
//!     }),
//!     console: None,
//! };
//! let logger = fanlog::build(Some(options))?;
//! logger.in_scope(|| tracing::warn!(port = 8080, "bind failed"));
//! # Ok(())
//! # }
//! ```
mod error;
mod format;
mod level;
mod logger;
mod options;
mod rotation;
mod sink;

pub use error::Error;
pub use format::LineFormat;
pub use level::LogLevel;
pub use logger::{build, build_simple, global, Logger, LoggerBuilder};
pub use options::{
    ConsoleSinkOptions, FileSinkOptions, LoggerOptions,
    DEFAULT_MAX_SIZE_MB,
};
pub use rotation::LogFileStatus;
pub use sink::{RotatingWriteTarget, SinkKind};

/// Target for tracing macros emitted by this crate.
pub const TARGET: &str = "fanlog";

pub(crate) type Result<T> = std::result::Result<T, Error>;

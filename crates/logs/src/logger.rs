//! Logger factory and the process-wide logger registry.
use crate::{
    rotation::{self, LogFileStatus},
    sink::{self, BoxedLayer, RotatingWriteTarget, SinkKind},
    ConsoleSinkOptions, Error, FileSinkOptions, LoggerOptions, Result,
    TARGET,
};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use tracing::{dispatcher::DefaultGuard, Dispatch};
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, Registry,
};

static GLOBAL: Lazy<RwLock<Option<Logger>>> =
    Lazy::new(|| RwLock::new(None));

/// Logger most recently built by [`build`], [`build_simple`]
/// or [`LoggerBuilder::build`].
///
/// Returns `None` until a logger has been built.
pub fn global() -> Option<Logger> {
    GLOBAL.read().clone()
}

fn bind_global(logger: &Logger) {
    *GLOBAL.write() = Some(logger.clone());
}

/// Build a console only logger that accepts every record
/// from the debug level upwards.
///
/// The logger is also bound as the global logger.
pub fn build_simple() -> Logger {
    let logger = Logger::assemble(
        ConsoleSinkOptions::fallback(),
        BoxMakeWriter::new(std::io::stdout),
        None,
    );
    bind_global(&logger);
    logger
}

/// Build a logger from options.
///
/// Missing options are rejected with [`Error::MissingOptions`]
/// before any sink is created; the global logger is only
/// replaced when the build succeeds.
pub fn build(options: Option<LoggerOptions>) -> Result<Logger> {
    let options = options.ok_or(Error::MissingOptions)?;
    LoggerBuilder::new(options).build()
}

/// Builder that allows the sink writers to be replaced.
pub struct LoggerBuilder {
    options: LoggerOptions,
    console_target: Option<BoxMakeWriter>,
    file_target: Option<Box<dyn RotatingWriteTarget>>,
}

impl LoggerBuilder {
    /// Create a builder for the given options.
    pub fn new(options: LoggerOptions) -> Self {
        Self {
            options,
            console_target: None,
            file_target: None,
        }
    }

    /// Builder for a console only debug level logger.
    pub fn simple() -> Self {
        Self::new(LoggerOptions {
            file: None,
            console: Some(ConsoleSinkOptions::fallback()),
        })
    }

    /// Write console records to `target` instead of standard output.
    pub fn console_target(mut self, target: BoxMakeWriter) -> Self {
        self.console_target = Some(target);
        self
    }

    /// Write file records to `target` instead of the rotating
    /// file described by the file sink options.
    ///
    /// Has no effect unless the options configure a file sink.
    pub fn file_target(mut self, target: impl RotatingWriteTarget) -> Self {
        self.file_target = Some(Box::new(target));
        self
    }

    /// Build the logger and bind it as the global logger.
    pub fn build(self) -> Result<Logger> {
        let console = self.options.console_or_default();
        let console_writer = self
            .console_target
            .unwrap_or_else(|| BoxMakeWriter::new(std::io::stdout));

        let file = match self.options.file {
            Some(file) => {
                if file.path.as_os_str().is_empty() {
                    return Err(Error::MissingFilePath);
                }
                let target = match self.file_target {
                    Some(target) => target,
                    None => Box::new(rotation::open(&file)?),
                };
                Some((file, target))
            }
            None => None,
        };

        let logger = Logger::assemble(console, console_writer, file);
        bind_global(&logger);
        Ok(logger)
    }
}

/// Fan-out logger writing every record to all of its sinks.
///
/// Cloning a logger is cheap and clones share the same sinks.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    sinks: Vec<SinkKind>,
    file: Option<FileSinkOptions>,
}

impl Logger {
    fn assemble(
        console: ConsoleSinkOptions,
        console_writer: BoxMakeWriter,
        file: Option<(FileSinkOptions, Box<dyn RotatingWriteTarget>)>,
    ) -> Self {
        let mut sinks = vec![SinkKind::Console];
        let mut layers: Vec<BoxedLayer> =
            vec![sink::console_layer(&console, console_writer)];

        let file = file.map(|(options, target)| {
            layers.push(sink::file_layer(&options, target));
            sinks.push(SinkKind::File);
            options
        });

        tracing::debug!(
            target: TARGET,
            console_level = %console.level,
            file_level = ?file.as_ref().map(|f| f.level),
            "logger::build",
        );

        Self {
            dispatch: Dispatch::new(Registry::default().with(layers)),
            sinks,
            file,
        }
    }

    /// Sinks in the order they were attached.
    pub fn sinks(&self) -> &[SinkKind] {
        &self.sinks
    }

    /// Whether records are written to standard output.
    pub fn has_console(&self) -> bool {
        self.sinks.contains(&SinkKind::Console)
    }

    /// Whether records are written to a log file.
    pub fn has_file(&self) -> bool {
        self.sinks.contains(&SinkKind::File)
    }

    /// Dispatcher for the sinks.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run a closure with this logger as the default
    /// for the current thread.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the default for the current thread
    /// until the guard is dropped.
    pub fn set_default(&self) -> DefaultGuard {
        tracing::dispatcher::set_default(&self.dispatch)
    }

    /// Install this logger as the default for every thread.
    ///
    /// Can succeed at most once per process.
    pub fn try_init(&self) -> Result<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|_| Error::AlreadyInstalled)
    }

    /// Status of the log file, `None` without a file sink.
    pub fn log_file_status(&self) -> Result<Option<LogFileStatus>> {
        self.file
            .as_ref()
            .map(|file| rotation::status(&file.path))
            .transpose()
    }

    /// Delete the rotated log files, the active file is kept.
    pub fn delete_rotated_files(&self) -> Result<()> {
        if let Some(file) = &self.file {
            rotation::delete_rotated(&file.path)?;
        }
        Ok(())
    }

    /// Delete rotated log files older than the configured
    /// maximum age and return how many were removed.
    pub fn prune_rotated_files(&self) -> Result<usize> {
        match &self.file {
            Some(file) if file.max_age_days > 0 => rotation::prune_expired(
                &file.path,
                rotation::max_age(file.max_age_days),
            ),
            _ => Ok(0),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.sinks)
            .field("file", &self.file.as_ref().map(|f| &f.path))
            .finish()
    }
}

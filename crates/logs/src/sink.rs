//! Console and file sinks.
//!
//! A sink is a formatting layer with its own writer and level
//! filter; the logger stacks every sink on a single registry.
use crate::{ConsoleSinkOptions, FileSinkOptions, LineFormat};
use parking_lot::{Mutex, MutexGuard};
use std::io::{self, Write};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, writer::BoxMakeWriter, MakeWriter},
    Layer, Registry,
};

pub(crate) type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Write target for the file sink.
///
/// Implementations accept formatted lines and take care of
/// rotating the underlying file; the rotating writer created
/// from [`FileSinkOptions`] is the default target.
pub trait RotatingWriteTarget: Write + Send + 'static {}

impl<W: Write + Send + 'static> RotatingWriteTarget for W {}

/// Kind of a sink attached to a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// Colorized standard output.
    Console,
    /// Plain text rotating file.
    File,
}

/// Shared file target, flushed after every record.
pub(crate) struct SharedTarget(Mutex<Box<dyn RotatingWriteTarget>>);

impl SharedTarget {
    pub fn new(target: Box<dyn RotatingWriteTarget>) -> Self {
        Self(Mutex::new(target))
    }
}

pub(crate) struct TargetGuard<'a>(MutexGuard<'a, Box<dyn RotatingWriteTarget>>);

impl Write for TargetGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Drop for TargetGuard<'_> {
    fn drop(&mut self) {
        let _ = self.0.flush();
    }
}

impl<'a> MakeWriter<'a> for SharedTarget {
    type Writer = TargetGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        TargetGuard(self.0.lock())
    }
}

/// Colorized sink writing to `writer`.
pub(crate) fn console_layer(
    options: &ConsoleSinkOptions,
    writer: BoxMakeWriter,
) -> BoxedLayer {
    fmt::layer()
        .event_format(LineFormat::colorized())
        .with_ansi(true)
        .with_writer(writer)
        .with_filter(LevelFilter::from(options.level))
        .boxed()
}

/// Plain text sink writing to `target`.
pub(crate) fn file_layer(
    options: &FileSinkOptions,
    target: Box<dyn RotatingWriteTarget>,
) -> BoxedLayer {
    fmt::layer()
        .event_format(LineFormat::plain())
        .with_ansi(false)
        .with_writer(SharedTarget::new(target))
        .with_filter(LevelFilter::from(options.level))
        .boxed()
}

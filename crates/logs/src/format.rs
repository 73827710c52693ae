//! Line encoding shared by the console and file sinks.
//!
//! Each event becomes one tab separated line:
//!
//! ```text
//! LEVEL    2024-05-01 13:04:05.123    src/main.rs:42    message key=value
//! ```
use crate::LogLevel;
use colored::Color;
use std::fmt::{self, Write};
use time::{macros::format_description, OffsetDateTime, UtcOffset};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{FormatEvent, FormatFields, Writer},
        time::FormatTime,
        FmtContext,
    },
    registry::LookupSpan,
};

const UNKNOWN_CALLER: &str = "<unknown>";

/// Millisecond timestamp in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timestamp {
    offset: UtcOffset,
}

impl Timestamp {
    /// Timestamp in the local offset, UTC if the offset
    /// cannot be determined.
    pub fn local() -> Self {
        Self::new(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    fn render(&self, at: OffsetDateTime) -> Result<String, fmt::Error> {
        at.to_offset(self.offset)
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
            ))
            .map_err(|_| fmt::Error)
    }
}

impl FormatTime for Timestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        w.write_str(&self.render(OffsetDateTime::now_utc())?)
    }
}

/// Event formatter writing one line per record.
///
/// The colorized variant wraps the level name in ANSI escape
/// codes, the plain variant writes the bare capitalized name.
///
/// Timestamps use the local UTC offset resolved when the formatter
/// is created. Where the platform refuses to report it, notably
/// multi-threaded processes on Unix, timestamps are written in UTC.
#[derive(Debug, Clone, Copy)]
pub struct LineFormat {
    ansi: bool,
    timer: Timestamp,
}

impl LineFormat {
    /// Formatter for terminals.
    pub fn colorized() -> Self {
        Self {
            ansi: true,
            timer: Timestamp::local(),
        }
    }

    /// Formatter for files.
    pub fn plain() -> Self {
        Self {
            ansi: false,
            timer: Timestamp::local(),
        }
    }

    fn write_level(
        &self,
        writer: &mut Writer<'_>,
        level: LogLevel,
    ) -> fmt::Result {
        if self.ansi {
            write!(
                writer,
                "\x1b[{}m{}\x1b[0m",
                level_color(level).to_fg_str(),
                level
            )
        } else {
            writer.write_str(level.as_str())
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        self.write_level(&mut writer, LogLevel::from(*meta.level()))?;
        writer.write_char('\t')?;
        self.timer.format_time(&mut writer)?;
        writer.write_char('\t')?;
        match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => {
                write!(writer, "{}:{}", short_caller(file), line)?
            }
            (Some(file), None) => writer.write_str(short_caller(file))?,
            _ => writer.write_str(UNKNOWN_CALLER)?,
        }
        writer.write_char('\t')?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Trace => Color::Cyan,
        LogLevel::Debug => Color::Magenta,
        LogLevel::Info => Color::Blue,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
    }
}

/// Trim a source path to its parent directory and file name.
fn short_caller(file: &str) -> &str {
    let mut separators = file.rmatch_indices(|c| c == '/' || c == '\\');
    match (separators.next(), separators.next()) {
        (Some(_), Some((index, _))) => &file[index + 1..],
        _ => file,
    }
}

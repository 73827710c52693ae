//! Test utilities.
#![deny(missing_docs)]
#![forbid(unsafe_code)]

use parking_lot::Mutex;
use std::{
    io::{self, Write},
    sync::Arc,
};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// ANSI escape introducer.
pub const ESC: char = '\x1b';

/// In-memory write target shared between the logger and a test.
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget(Arc<Mutex<Vec<u8>>>);

impl MemoryTarget {
    /// Create an empty target.
    pub fn new() -> Self {
        Default::default()
    }

    /// Writer for a console sink.
    pub fn make_writer(&self) -> BoxMakeWriter {
        BoxMakeWriter::new(std::sync::Mutex::new(self.clone()))
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(|l| l.to_owned()).collect()
    }
}

impl Write for MemoryTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Console writer that drops every record.
pub fn discard() -> BoxMakeWriter {
    BoxMakeWriter::new(io::sink)
}

/// Split a rendered line into its tab separated columns.
pub fn columns(line: &str) -> Vec<&str> {
    line.splitn(4, '\t').collect()
}

/// Whether `value` looks like `YYYY-MM-DD HH:MM:SS.mmm`.
pub fn is_timestamp(value: &str) -> bool {
    const LAYOUT: &[u8] = b"dddd-dd-dd dd:dd:dd.ddd";
    value.len() == LAYOUT.len()
        && value.bytes().zip(LAYOUT).all(|(c, expected)| match expected {
            b'd' => c.is_ascii_digit(),
            other => c == *other,
        })
}

/// Remove ANSI escape sequences from a line.
pub fn strip_ansi(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == ESC {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Names of the levels rendered in `lines`, escapes removed.
pub fn levels(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            let plain = strip_ansi(line);
            columns(&plain)[0].to_owned()
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn timestamp_shape() {
        assert!(is_timestamp("2024-01-31 23:59:59.999"));
        assert!(!is_timestamp("2024-01-31T23:59:59.999"));
        assert!(!is_timestamp("2024-01-31 23:59:59"));
    }

    #[test]
    fn strip_escapes() {
        assert_eq!("INFO\tx", strip_ansi("\x1b[34mINFO\x1b[0m\tx"));
    }
}

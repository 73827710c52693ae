//! Rotating log file target and retention of rotated files.
use crate::{Error, FileSinkOptions, Result, TARGET};
use logroller::{
    Compression, LogRoller, LogRollerBuilder, Rotation, RotationSize,
};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Current log file and the files rotated out of it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogFileStatus {
    /// Path of the file receiving records.
    pub current: PathBuf,
    /// Rotated files sorted by name.
    pub rotated: Vec<PathBuf>,
    /// Size of the current and rotated files in bytes.
    pub total_size: u64,
}

/// Writer that enforces the age limit on rotated files.
///
/// A rotation is detected when the active file is shorter after
/// a write than the bytes written imply; expired rotated files
/// are then removed.
pub(crate) struct RetainedTarget<W> {
    inner: W,
    path: PathBuf,
    max_age: Option<Duration>,
    last_len: u64,
}

impl<W: Write> RetainedTarget<W> {
    pub fn new(inner: W, path: PathBuf, max_age: Option<Duration>) -> Self {
        let last_len = current_len(&path);
        Self {
            inner,
            path,
            max_age,
            last_len,
        }
    }

    fn after_write(&mut self, written: usize) {
        let len = current_len(&self.path);
        let expected = self.last_len.saturating_add(written as u64);
        if let Some(max_age) = self.max_age {
            if len < expected {
                // Retention failures must not fail the record write.
                let _ = remove_expired(&self.path, max_age);
            }
        }
        self.last_len = len;
    }
}

impl<W: Write> Write for RetainedTarget<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.after_write(written);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn current_len(path: &Path) -> u64 {
    fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
}

/// Open the rotating writer for a file sink.
///
/// Rotated files older than `max_age_days` are removed
/// before the writer is created and after every rotation.
pub(crate) fn open(
    options: &FileSinkOptions,
) -> Result<RetainedTarget<LogRoller>> {
    let (directory, file_name) = split_path(&options.path)?;
    fs::create_dir_all(directory)?;

    if options.max_age_days > 0 {
        prune_expired(&options.path, max_age(options.max_age_days))?;
    }

    let mut builder = LogRollerBuilder::new(directory, file_name).rotation(
        Rotation::SizeBased(RotationSize::MB(options.rotation_size_mb())),
    );
    if options.max_backups > 0 {
        builder = builder.max_keep_files(options.max_backups);
    }
    if options.compress {
        builder = builder.compression(Compression::Gzip);
    }

    tracing::debug!(
        target: TARGET,
        path = %options.path.display(),
        max_size_mb = options.rotation_size_mb(),
        max_backups = options.max_backups,
        compress = options.compress,
        "rotation::open",
    );

    let roller = builder
        .build()
        .map_err(|e| Error::Rotation(e.to_string()))?;
    let retention =
        (options.max_age_days > 0).then(|| max_age(options.max_age_days));
    Ok(RetainedTarget::new(roller, options.path.clone(), retention))
}

/// Status of the log file at `path`.
pub(crate) fn status(path: &Path) -> Result<LogFileStatus> {
    let rotated = rotated_files(path)?;
    let total_size = std::iter::once(path)
        .chain(rotated.iter().map(PathBuf::as_path))
        .filter_map(|file| fs::metadata(file).ok())
        .map(|meta| meta.len())
        .sum();
    Ok(LogFileStatus {
        current: path.to_path_buf(),
        rotated,
        total_size,
    })
}

/// Delete every rotated file, the current file is kept.
pub(crate) fn delete_rotated(path: &Path) -> Result<()> {
    for file in rotated_files(path)? {
        fs::remove_file(file)?;
    }
    Ok(())
}

/// Delete rotated files last modified more than `max_age` ago.
pub(crate) fn prune_expired(path: &Path, max_age: Duration) -> Result<usize> {
    let removed = remove_expired(path, max_age)?;
    for file in &removed {
        tracing::debug!(
            target: TARGET,
            file = %file.display(),
            "rotation::prune",
        );
    }
    Ok(removed.len())
}

fn remove_expired(path: &Path, max_age: Duration) -> Result<Vec<PathBuf>> {
    let now = SystemTime::now();
    let mut removed = Vec::new();
    for file in rotated_files(path)? {
        let modified = fs::metadata(&file)?.modified()?;
        let expired = now
            .duration_since(modified)
            .map(|age| age >= max_age)
            .unwrap_or(false);
        if expired {
            fs::remove_file(&file)?;
            removed.push(file);
        }
    }
    Ok(removed)
}

pub(crate) fn max_age(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY))
}

/// Whether `name` is a rotated copy of `file_name`, either
/// `{file_name}.{index}` or `{file_name}.{index}.gz`.
fn is_rotated_name(name: &str, file_name: &str) -> bool {
    let Some(suffix) = name
        .strip_prefix(file_name)
        .and_then(|rest| rest.strip_prefix('.'))
    else {
        return false;
    };
    let index = suffix.strip_suffix(".gz").unwrap_or(suffix);
    !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
}

/// Rotated files in the log directory.
fn rotated_files(path: &Path) -> Result<Vec<PathBuf>> {
    let (directory, file_name) = split_path(path)?;

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Vec::new())
        }
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_rotated_name(name, file_name) && entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Split a log file path into its directory and file name.
///
/// An empty path is rejected here rather than handed to the
/// rotating writer.
fn split_path(path: &Path) -> Result<(&str, &str)> {
    if path.as_os_str().is_empty() {
        return Err(Error::MissingFilePath);
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent
            .to_str()
            .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?,
        _ => ".",
    };
    Ok((directory, file_name))
}

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::clock::{self, BackupSuffix};
use crate::error::ConfigError;
use crate::level::Severity;
use crate::sink::Sink;

/// Size-rotated file output with an optional error-only mirror.
///
/// The sink owns up to two append-mode files:
///
/// * `main` at `<dir>/<name>`, receiving every line
/// * `errors` at `<dir>/<name>.err`, receiving lines at `ERROR` and above,
///   present only when error separation is enabled
///
/// Before each write the stream's byte count is compared with the size
/// threshold. Once it is reached the file is closed, renamed to
/// `<file>.bak<id>` and reopened empty, so a file never grows past the
/// threshold by more than one line. `<id>` is the millisecond timestamp of
/// the log call (`YYYYMMDDHHMMSSmmm`); both streams rotated by the same call
/// share it. A threshold of zero disables rotation.
///
/// # Thread Safety
///
/// One mutex guards both streams. The whole check, rotate and write
/// sequence for a call runs under it, so concurrent lines are linearized:
/// each one lands whole in exactly one file, either the backup or the fresh
/// file, never in both.
///
/// # Failures
///
/// Write and rotation errors are reported through `tracing` and counted in
/// [`SinkStats::dropped`]. The failed line is skipped, never written to a
/// stale handle, and the next call retries the rotation.
pub struct RotatingFileSink {
    main_path: PathBuf,
    error_path: Option<PathBuf>,
    max_file_size: u64,
    state: Mutex<Streams>,
}

/// Counters for what a [`RotatingFileSink`] has done so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SinkStats {
    /// Successful writes, counting a mirrored error line once per stream.
    pub lines_written: u64,
    pub rotations: u64,
    /// Writes skipped because of an I/O or rotation failure.
    pub dropped: u64,
}

struct Streams {
    main: FileStream,
    errors: Option<FileStream>,
    stats: SinkStats,
}

#[derive(Debug)]
struct FileStream {
    path: PathBuf,
    /// `None` after a rotation failed between closing and reopening.
    file: Option<File>,
    size: u64,
    suffix: BackupSuffix,
}

impl FileStream {
    fn open(path: PathBuf) -> io::Result<Self> {
        let file = open_append(&path)?;
        // Appending to an existing log keeps counting from its length.
        let size = file.metadata()?.len();
        Ok(Self {
            path,
            file: Some(file),
            size,
            suffix: BackupSuffix::new(),
        })
    }

    fn needs_rotation(&self, max_file_size: u64) -> bool {
        self.file.is_none() || (max_file_size > 0 && self.size >= max_file_size)
    }

    /// Closes, renames and reopens the file. Returns the backup path, or
    /// `None` when there was no file left to back up.
    fn rotate(&mut self, id: u64) -> io::Result<Option<PathBuf>> {
        // Dropping the handle closes it.
        self.file = None;

        let backup = backup_path(&self.path, self.suffix.next(id));
        let renamed = match fs::rename(&self.path, &backup) {
            Ok(()) => Some(backup),
            // Already moved away by an earlier attempt whose reopen failed.
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => return Err(error),
        };

        self.file = Some(open_append(&self.path)?);
        self.size = 0;
        Ok(renamed)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "log file is closed"))?;
        file.write_all(line.as_bytes())?;
        self.size += line.len() as u64;
        Ok(())
    }

    /// Rotates if needed, then writes. Failures are reported and counted.
    /// Returns whether the line reached the file.
    fn append(&mut self, line: &str, max_file_size: u64, id: u64, stats: &mut SinkStats) -> bool {
        if self.needs_rotation(max_file_size) {
            match self.rotate(id) {
                Ok(backup) => {
                    stats.rotations += 1;
                    tracing::debug!(path = %self.path.display(), backup = ?backup, "rotated log file");
                }
                Err(error) => {
                    stats.dropped += 1;
                    tracing::error!(path = %self.path.display(), %error, "log rotation failed, line dropped");
                    return false;
                }
            }
        }

        match self.write_line(line) {
            Ok(()) => {
                stats.lines_written += 1;
                true
            }
            Err(error) => {
                stats.dropped += 1;
                tracing::warn!(path = %self.path.display(), %error, "failed to write log line");
                false
            }
        }
    }
}

impl RotatingFileSink {
    /// Opens (creating if absent) `<directory>/<file_name>` and, when
    /// `separate_errors` is set, `<directory>/<file_name>.err`.
    ///
    /// The directory must already exist.
    pub fn open(
        directory: impl AsRef<Path>,
        file_name: &str,
        max_file_size: u64,
        separate_errors: bool,
    ) -> Result<Self, ConfigError> {
        let main_path = directory.as_ref().join(file_name);
        let main = open_stream(main_path.clone())?;

        let (error_path, errors) = if separate_errors {
            let path = error_path_for(&main_path);
            let stream = open_stream(path.clone())?;
            (Some(path), Some(stream))
        } else {
            (None, None)
        };

        Ok(Self {
            main_path,
            error_path,
            max_file_size,
            state: Mutex::new(Streams {
                main,
                errors,
                stats: SinkStats::default(),
            }),
        })
    }

    pub fn main_path(&self) -> &Path {
        &self.main_path
    }

    /// Path of the error-only stream, if error separation is enabled.
    pub fn error_path(&self) -> Option<&Path> {
        self.error_path.as_deref()
    }

    pub fn stats(&self) -> SinkStats {
        self.state.lock().stats
    }

    /// Writes `line` using `id` as the rotation suffix should either stream
    /// need rotating.
    pub fn emit_at(&self, severity: Severity, line: &str, id: u64) {
        let mut state = self.state.lock();
        let Streams {
            main,
            errors,
            stats,
        } = &mut *state;

        // A line the main log dropped must not show up in the error log alone.
        let written = main.append(line, self.max_file_size, id, stats);

        if written && severity >= Severity::Error {
            if let Some(errors) = errors {
                errors.append(line, self.max_file_size, id, stats);
            }
        }
    }
}

impl Sink for RotatingFileSink {
    fn emit(&self, severity: Severity, line: &str) {
        let id = clock::timestamp_id(&clock::now());
        self.emit_at(severity, line, id);
    }
}

/// `<path>.bak<suffix>`
pub fn backup_path(path: &Path, suffix: u64) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".bak{suffix}"));
    PathBuf::from(name)
}

/// `<path>.err`
pub fn error_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".err");
    PathBuf::from(name)
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn open_stream(path: PathBuf) -> Result<FileStream, ConfigError> {
    FileStream::open(path.clone()).map_err(|source| ConfigError::OpenFile { path, source })
}

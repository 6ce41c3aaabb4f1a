//! Leveled, rotating file logger.
//!
//! A [`Logger`] owns one append-mode handle on `<dir>/<base_name>` and a
//! single lock that serializes writes, size checks and rotation. Rotation is
//! a side effect of ordinary writes: once a write makes the active file reach
//! its size threshold, the handle is closed, the [`Rotator`] renames the file
//! and prunes old generations, and a fresh handle is opened at the original
//! path before the lock is released.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::Local;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::LoggerConfig;
use crate::error::{LogError, Result};
use crate::format::format_line;
use crate::rotator::Rotator;
use crate::severity::Severity;

/// Handle state guarded by the logger's lock.
#[derive(Debug)]
enum Stream {
    /// A handle on the file currently named `<dir>/<base_name>`.
    Open(File),
    /// Reopening after a rotation failed; retried on the next operation.
    Degraded,
    /// Closed by the caller. Terminal.
    Closed,
}

/// A writable, rotatable log stream.
///
/// All methods take `&self`; share a logger between threads with
/// [`std::sync::Arc`]. Writes on one logger are totally ordered.
#[derive(Debug)]
pub struct Logger {
    path: PathBuf,
    rotator: Rotator,
    level: AtomicU8,
    stream: Mutex<Stream>,
}

impl Logger {
    /// Opens the active file in append-create mode.
    ///
    /// The directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidConfig`] or [`LogError::InvalidPath`] for a
    /// bad config and [`LogError::Open`] if the file cannot be opened.
    pub fn open(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;
        let rotator = Rotator::from_config(config);
        let path = rotator.active_path();
        let file = open_append(&path).map_err(|source| LogError::Open {
            path: path.clone(),
            source,
        })?;
        debug!(
            path = %path.display(),
            level = %config.level,
            max_bytes = config.max_bytes,
            max_generations = config.max_generations,
            "opened log file"
        );
        Ok(Self {
            path,
            rotator,
            level: AtomicU8::new(config.level.as_u8()),
            stream: Mutex::new(Stream::Open(file)),
        })
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The rotation policy for this stream.
    #[must_use]
    pub const fn rotator(&self) -> &Rotator {
        &self.rotator
    }

    /// Current minimum severity.
    #[must_use]
    pub fn level(&self) -> Severity {
        Severity::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Changes the minimum severity. The file handle is left alone.
    pub fn set_level(&self, level: Severity) {
        self.level.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Returns true if a message of `severity` would be written.
    #[must_use]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity.is_enabled_at(self.level())
    }

    /// Returns true if the logger currently holds no writable handle
    /// because a post-rotation reopen failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(*self.stream.lock(), Stream::Degraded)
    }

    /// Returns true once [`Logger::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(*self.stream.lock(), Stream::Closed)
    }

    /// Writes `message` at `severity`, rotating afterwards if due.
    ///
    /// Messages less urgent than the configured level are dropped. Errors
    /// from the size check, rename or prune are returned, but the line has
    /// already been appended by then.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Closed`] after close, [`LogError::Write`] if the
    /// append fails, and any rotation error (see
    /// [`Logger::rotate_if_needed`]).
    pub fn write(&self, severity: Severity, message: &str) -> Result<()> {
        if !self.is_enabled(severity) {
            return Ok(());
        }
        self.emit(Some(severity), message)
    }

    /// Writes `message` without a severity tag, regardless of level.
    ///
    /// # Errors
    ///
    /// Same as [`Logger::write`].
    pub fn log(&self, message: &str) -> Result<()> {
        self.emit(None, message)
    }

    /// Writes at [`Severity::Fatal`]. Does not terminate the process.
    pub fn fatal(&self, message: &str) -> Result<()> {
        self.write(Severity::Fatal, message)
    }

    /// Writes at [`Severity::Error`].
    pub fn error(&self, message: &str) -> Result<()> {
        self.write(Severity::Error, message)
    }

    /// Writes at [`Severity::Warn`].
    pub fn warn(&self, message: &str) -> Result<()> {
        self.write(Severity::Warn, message)
    }

    /// Writes at [`Severity::Notice`].
    pub fn notice(&self, message: &str) -> Result<()> {
        self.write(Severity::Notice, message)
    }

    /// Writes at [`Severity::Info`].
    pub fn info(&self, message: &str) -> Result<()> {
        self.write(Severity::Info, message)
    }

    /// Writes at [`Severity::Debug`].
    pub fn debug(&self, message: &str) -> Result<()> {
        self.write(Severity::Debug, message)
    }

    /// Rotates the active file if it has reached the size threshold.
    ///
    /// Returns whether a rotation happened.
    ///
    /// # Errors
    ///
    /// - [`LogError::Stat`] if the size check failed (rotation is skipped)
    /// - [`LogError::Rename`] if the rename failed (the active file keeps
    ///   growing; the handle is reopened)
    /// - [`LogError::ListGenerations`] if pruning could not list the directory
    /// - [`LogError::Reopen`] if no fresh handle could be opened
    pub fn rotate_if_needed(&self) -> Result<bool> {
        let mut stream = self.stream.lock();
        self.ensure_open(&mut stream)?;
        self.rotate_if_needed_locked(&mut stream)
    }

    /// Rotates the active file regardless of its size.
    ///
    /// # Errors
    ///
    /// Same as [`Logger::rotate_if_needed`], minus the size check.
    pub fn force_rotate(&self) -> Result<PathBuf> {
        let mut stream = self.stream.lock();
        self.ensure_open(&mut stream)?;
        self.roll_locked(&mut stream)
    }

    /// Flushes and releases the handle. Further writes fail with
    /// [`LogError::Closed`]; closing again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Close`] if syncing the file to disk fails.
    pub fn close(&self) -> Result<()> {
        let mut stream = self.stream.lock();
        match std::mem::replace(&mut *stream, Stream::Closed) {
            Stream::Open(file) => {
                debug!(path = %self.path.display(), "closing log file");
                file.sync_all().map_err(|source| LogError::Close {
                    path: self.path.clone(),
                    source,
                })
            }
            Stream::Degraded | Stream::Closed => Ok(()),
        }
    }

    fn emit(&self, severity: Option<Severity>, message: &str) -> Result<()> {
        let mut stream = self.stream.lock();
        self.ensure_open(&mut stream)?;
        let line = format_line(&Local::now(), severity, message);
        if let Stream::Open(file) = &mut *stream {
            file.write_all(line.as_bytes())
                .and_then(|()| file.flush())
                .map_err(|source| LogError::Write {
                    path: self.path.clone(),
                    source,
                })?;
        }
        self.rotate_if_needed_locked(&mut stream).map(|_| ())
    }

    /// Recovers a degraded stream by reopening the active path.
    fn ensure_open(&self, stream: &mut Stream) -> Result<()> {
        match stream {
            Stream::Open(_) => Ok(()),
            Stream::Closed => Err(LogError::Closed(self.path.clone())),
            Stream::Degraded => {
                let file = self.reopen()?;
                info!(path = %self.path.display(), "recovered degraded log file");
                *stream = Stream::Open(file);
                Ok(())
            }
        }
    }

    fn rotate_if_needed_locked(&self, stream: &mut Stream) -> Result<bool> {
        if !self.rotator.is_rotatable()? {
            return Ok(false);
        }
        self.roll_locked(stream).map(|_| true)
    }

    /// Close, rename, prune, reopen. The caller holds the lock.
    fn roll_locked(&self, stream: &mut Stream) -> Result<PathBuf> {
        // Dropping the handle closes it; new writes must land in the fresh file.
        *stream = Stream::Degraded;

        let rotated = self.rotator.rotate();
        let pruned = match &rotated {
            Ok(_) => self.rotator.remove_old_generations().map(|_| ()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "log rotation failed");
                Ok(())
            }
        };

        match self.reopen() {
            Ok(file) => *stream = Stream::Open(file),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "log file left without a handle");
                return Err(e);
            }
        }

        let rotated = rotated?;
        pruned?;
        info!(
            path = %self.path.display(),
            generation = %rotated.display(),
            "log file rotated"
        );
        Ok(rotated)
    }

    fn reopen(&self) -> Result<File> {
        open_append(&self.path).map_err(|source| LogError::Reopen {
            path: self.path.clone(),
            source,
        })
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_logger(level: Severity, max_bytes: u64, max_generations: usize) -> (Logger, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = LoggerConfig::new(temp_dir.path(), "app.log")
            .with_level(level)
            .with_max_bytes(max_bytes)
            .with_max_generations(max_generations);
        let logger = Logger::open(&config).expect("open logger");
        (logger, temp_dir)
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn logger_open_creates_active_file() {
        let (logger, dir) = make_logger(Severity::Info, 1024, 5);
        assert!(dir.path().join("app.log").exists());
        assert_eq!(logger.path(), dir.path().join("app.log"));
        assert_eq!(logger.level(), Severity::Info);
    }

    #[test]
    fn logger_open_missing_directory_fails() {
        let config = LoggerConfig::new("/nonexistent/logroll/dir", "app.log");
        let result = Logger::open(&config);
        assert!(matches!(result, Err(LogError::Open { .. })));
    }

    #[test]
    fn logger_open_rejects_zero_threshold() {
        let dir = TempDir::new().expect("create temp dir");
        let config = LoggerConfig::new(dir.path(), "app.log").with_max_bytes(0);
        assert!(matches!(Logger::open(&config), Err(LogError::InvalidConfig(_))));
    }

    #[test]
    fn logger_appends_to_existing_file() {
        let dir = TempDir::new().expect("create temp dir");
        fs::write(dir.path().join("app.log"), "earlier line\n").expect("seed file");

        let config = LoggerConfig::new(dir.path(), "app.log");
        let logger = Logger::open(&config).expect("open logger");
        logger.info("later line").expect("write");

        let lines = read_lines(logger.path());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "earlier line");
        assert!(lines[1].ends_with("[INFO] later line"));
    }

    #[test]
    fn logger_writes_formatted_lines() {
        let (logger, _dir) = make_logger(Severity::Debug, 1024 * 1024, 5);
        logger.warn("low disk").expect("write");
        logger.log("new access.").expect("write");

        let lines = read_lines(logger.path());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" [WARN] low disk"));
        assert!(lines[1].ends_with(" new access."));
        assert!(!lines[1].contains('['));
    }

    #[test]
    fn logger_filters_by_level() {
        let (logger, _dir) = make_logger(Severity::Notice, 1024 * 1024, 5);
        logger.fatal("f").expect("write");
        logger.error("e").expect("write");
        logger.warn("w").expect("write");
        logger.notice("n").expect("write");
        logger.info("i").expect("write");
        logger.debug("d").expect("write");

        let lines = read_lines(logger.path());
        let labels: Vec<&str> = lines
            .iter()
            .filter_map(|l| l.split('[').nth(1))
            .filter_map(|l| l.split(']').next())
            .collect();
        assert_eq!(labels, vec!["FATAL", "ERROR", "WARN", "NOTICE"]);
    }

    #[test]
    fn logger_untagged_log_ignores_level() {
        let (logger, _dir) = make_logger(Severity::Fatal, 1024 * 1024, 5);
        logger.info("dropped").expect("write");
        logger.log("kept").expect("write");
        assert_eq!(read_lines(logger.path()).len(), 1);
    }

    #[test]
    fn logger_set_level_keeps_handle() {
        let (logger, _dir) = make_logger(Severity::Error, 1024 * 1024, 5);
        logger.info("suppressed").expect("write");
        logger.set_level(Severity::Debug);
        assert_eq!(logger.level(), Severity::Debug);
        logger.info("emitted").expect("write");

        let lines = read_lines(logger.path());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("emitted"));
        assert!(!logger.is_degraded());
    }

    #[test]
    fn logger_rotates_when_threshold_reached() {
        let (logger, _dir) = make_logger(Severity::Info, 1, 5);
        logger.info("first").expect("write");

        let generations = logger.rotator().generations().expect("list");
        assert_eq!(generations.len(), 1);
        assert_eq!(read_lines(&generations[0].path).len(), 1);
        assert!(read_lines(logger.path()).is_empty());

        logger.info("second").expect("write");
        assert_eq!(logger.rotator().generations().expect("list").len(), 2);
    }

    #[test]
    fn logger_rotate_if_needed_without_writes() {
        let (logger, _dir) = make_logger(Severity::Info, 1024, 5);
        assert!(matches!(logger.rotate_if_needed(), Ok(false)));

        fs::write(logger.path(), vec![b'x'; 2048]).expect("grow file");
        assert!(matches!(logger.rotate_if_needed(), Ok(true)));
        assert_eq!(fs::metadata(logger.path()).map(|m| m.len()).ok(), Some(0));
    }

    #[test]
    fn logger_force_rotate() {
        let (logger, _dir) = make_logger(Severity::Info, 1024 * 1024, 5);
        logger.info("before").expect("write");

        let rotated = logger.force_rotate().expect("rotate");
        logger.info("after").expect("write");

        assert_eq!(read_lines(&rotated).len(), 1);
        let active = read_lines(logger.path());
        assert_eq!(active.len(), 1);
        assert!(active[0].ends_with("after"));
    }

    #[test]
    fn logger_prunes_generations() {
        let (logger, _dir) = make_logger(Severity::Info, 1, 2);
        for i in 0..5 {
            logger.info(&format!("line {i}")).expect("write");
        }
        let generations = logger.rotator().generations().expect("list");
        assert_eq!(generations.len(), 2);

        let newest = read_lines(&generations[1].path);
        assert!(newest[0].ends_with("line 4"));
        assert!(logger.path().exists());
    }

    #[test]
    fn logger_close_then_write_fails() {
        let (logger, _dir) = make_logger(Severity::Info, 1024, 5);
        logger.info("open").expect("write");
        assert!(logger.close().is_ok());
        assert!(logger.is_closed());

        assert!(matches!(logger.info("late"), Err(LogError::Closed(_))));
        assert!(matches!(logger.rotate_if_needed(), Err(LogError::Closed(_))));
        assert!(logger.close().is_ok());
        assert_eq!(read_lines(logger.path()).len(), 1);
    }

    #[test]
    fn logger_suppressed_write_after_close_is_noop() {
        let (logger, _dir) = make_logger(Severity::Error, 1024, 5);
        assert!(logger.close().is_ok());
        assert!(logger.debug("filtered before the stream is touched").is_ok());
    }

    #[test]
    fn logger_active_file_removed_externally_reports_stat_error() {
        let (logger, _dir) = make_logger(Severity::Info, 1024, 5);
        fs::remove_file(logger.path()).expect("remove active file");

        // The line goes to the unlinked inode; the size check fails.
        let result = logger.info("orphaned");
        assert!(matches!(result, Err(LogError::Stat { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn logger_reopen_failure_degrades_then_recovers() {
        let dir = TempDir::new().expect("create temp dir");
        // Long enough that `<base>-<seconds>` exceeds NAME_MAX, so the rename fails.
        let base_name = "a".repeat(250);
        let config = LoggerConfig::new(dir.path(), base_name.as_str()).with_max_bytes(1024);
        let logger = Logger::open(&config).expect("open logger");

        // A directory at the active path cannot be opened for append.
        fs::remove_file(logger.path()).expect("remove active file");
        fs::create_dir(logger.path()).expect("create dir at active path");

        let result = logger.force_rotate();
        assert!(matches!(result, Err(LogError::Reopen { .. })));
        assert!(result.is_err_and(|e| e.is_reopen_failure()));
        assert!(logger.is_degraded());

        fs::remove_dir(logger.path()).expect("remove dir");
        logger.info("back").expect("write after recovery");
        assert!(!logger.is_degraded());

        let lines = read_lines(logger.path());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("[INFO] back"));
    }
}

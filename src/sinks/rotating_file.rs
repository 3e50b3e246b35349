//! Rotating file sink
//!
//! Appends lines to a file and rotates it once it would grow past a size
//! limit. Rotated files are kept as numbered backups (`app.log.1` is the
//! newest), capped by count and by age, and optionally gzip-compressed.

use crate::core::error::{LoggerError, Result};
use crate::core::sink::Sink;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const BYTES_PER_MB: u64 = 1024 * 1024;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Rotation thresholds for a [`RotatingFileSink`]
///
/// # Examples
///
/// ```
/// use esl_logger::sinks::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(50)
///     .with_max_backups(7)
///     .with_max_age_days(14)
///     .with_compression(true);
///
/// assert_eq!(policy.max_bytes(), 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Size in megabytes a file may reach before it is rotated
    pub max_size_mb: u64,
    /// Rotated files to keep; 0 keeps all of them
    pub max_backups: usize,
    /// Days a rotated file is kept; 0 disables age-based removal
    pub max_age_days: u64,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size_mb: 100,
            max_backups: 0,
            max_age_days: 0,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 10 MB per file, 3 backups, 30 days
    #[must_use]
    pub fn production() -> Self {
        Self {
            max_size_mb: 10,
            max_backups: 3,
            max_age_days: 30,
            compress: false,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_size_mb = megabytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Maximum age of a backup, if age-based removal is enabled
    #[must_use]
    pub fn max_age(&self) -> Option<Duration> {
        (self.max_age_days > 0).then(|| Duration::from_secs(self.max_age_days * SECS_PER_DAY))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_size_mb == 0 {
            return Err(LoggerError::config(
                "RotationPolicy",
                "max_size_mb must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// File sink with size-based rotation.
///
/// The file is opened lazily on the first write, so constructing the sink
/// never fails; problems surface as write errors instead. Each line is
/// flushed to the file before [`Sink::write_line`] returns, so a failed
/// write is reported for the line that caused it. Opening the file also
/// prunes backups beyond the count and age limits.
///
/// When rotation fails the sink keeps appending to the current file and
/// retries rotation on every following write.
///
/// # Examples
///
/// ```no_run
/// use esl_logger::core::Sink;
/// use esl_logger::sinks::{RotatingFileSink, RotationPolicy};
///
/// let mut sink = RotatingFileSink::new("/var/log/app.log", RotationPolicy::production());
/// sink.write_line("service started").unwrap();
/// sink.flush().unwrap();
/// ```
pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileSink {
    pub fn new(path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        Self {
            base_path: path.into(),
            policy,
            writer: None,
            current_size: 0,
        }
    }

    /// Open the current file in append mode, creating it and its directory
    fn open(&mut self) -> Result<()> {
        if let Some(parent) = self.base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::file_sink(
                    self.base_path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        let metadata = file.metadata().map_err(|e| {
            LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?;

        self.current_size = metadata.len();
        self.writer = Some(BufWriter::new(file));
        self.prune_backups();
        Ok(())
    }

    /// Move the current file to `.1`, shifting and pruning older backups
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let limit = if self.policy.max_backups == 0 {
            self.highest_backup_index() + 1
        } else {
            self.policy.max_backups
        };

        // The backup at `limit` would be shifted out of range
        for path in [self.backup_path(limit), self.compressed_path(limit)] {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    LoggerError::file_rotation(
                        path.display().to_string(),
                        format!("Failed to remove oldest backup: {}", e),
                    )
                })?;
            }
        }

        for i in (1..limit).rev() {
            for (old, new) in [
                (self.backup_path(i), self.backup_path(i + 1)),
                (self.compressed_path(i), self.compressed_path(i + 1)),
            ] {
                if old.exists() {
                    fs::rename(&old, &new).map_err(|e| {
                        LoggerError::file_rotation(
                            old.display().to_string(),
                            format!("Failed to rotate backup files: {}", e),
                        )
                    })?;
                }
            }
        }

        if self.base_path.exists() {
            let backup = self.backup_path(1);
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                self.compress_file(&backup, &self.compressed_path(1))?;
            }
        }

        self.remove_expired(limit);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;
        Ok(())
    }

    /// Remove backups past the count limit, then those past the age limit
    fn prune_backups(&self) {
        let highest = self.highest_backup_index();
        if self.policy.max_backups > 0 {
            for i in (self.policy.max_backups + 1)..=highest {
                for path in [self.backup_path(i), self.compressed_path(i)] {
                    let _ = fs::remove_file(&path);
                }
            }
        }
        self.remove_expired(highest);
    }

    /// Remove backups older than the policy's maximum age
    fn remove_expired(&self, limit: usize) {
        let Some(max_age) = self.policy.max_age() else {
            return;
        };
        let now = SystemTime::now();

        for i in 1..=limit {
            for path in [self.backup_path(i), self.compressed_path(i)] {
                let expired = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .map(|modified| now.duration_since(modified).unwrap_or(Duration::ZERO) > max_age)
                    .unwrap_or(false);
                if expired {
                    // Best effort: a backup that cannot be removed now is retried next rotation
                    let _ = fs::remove_file(&path);
                }
            }
        }
    }

    fn highest_backup_index(&self) -> usize {
        let mut index = 0;
        while self.backup_path(index + 1).exists() || self.compressed_path(index + 1).exists() {
            index += 1;
        }
        index
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.sibling_path(format!(".{}", index))
    }

    fn compressed_path(&self, index: usize) -> PathBuf {
        self.sibling_path(format!(".{}.gz", index))
    }

    fn sibling_path(&self, suffix: String) -> PathBuf {
        let filename = self
            .base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        self.base_path.with_file_name(format!("{}{}", filename, suffix))
    }

    /// Gzip `path` into `gz_path`, removing the original only once the
    /// compressed file is complete
    fn compress_file(&self, path: &Path, gz_path: &Path) -> Result<()> {
        let temp_path = gz_path.with_extension("gz.tmp");

        let compress = || -> std::io::Result<()> {
            let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
            let output = BufWriter::with_capacity(64 * 1024, File::create(&temp_path)?);
            let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
            std::io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?.flush()?;
            fs::rename(&temp_path, gz_path)
        };

        if let Err(e) = compress() {
            let _ = fs::remove_file(&temp_path);
            return Err(LoggerError::io_operation(
                "compress log file",
                format!("Failed to compress '{}'", path.display()),
                e,
            ));
        }

        // The compressed copy is complete; a leftover original is harmless
        let _ = fs::remove_file(path);
        Ok(())
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Sink for RotatingFileSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let len = line.len() as u64 + 1;
        let max = self.policy.max_bytes();
        if len > max {
            return Err(LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("line of {} bytes exceeds maximum file size of {} bytes", len, max),
            ));
        }

        if self.writer.is_none() {
            self.open()?;
        }

        if self.current_size + len > max {
            if let Err(e) = self.rotate() {
                // Keep appending to the current file rather than losing the line;
                // reopening reads back the real size
                if self.writer.is_none() {
                    self.open().map_err(|_| e)?;
                }
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| {
                LoggerError::file_sink(self.base_path.display().to_string(), "writer not initialized")
            })?;

        let result = writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush());

        if let Err(e) = result {
            // Discard the buffered remainder so a failed line never lands later
            if let Some(writer) = self.writer.take() {
                let _ = writer.into_parts();
            }
            return Err(LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Failed to write log line: {}", e),
            ));
        }
        self.current_size += len;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_sink(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    /// 1023 characters plus the newline: 1024 lines fill one megabyte exactly
    fn kib_line(tag: usize) -> String {
        format!("{:0>1023}", tag)
    }

    fn small_policy() -> RotationPolicy {
        RotationPolicy::new().with_max_size_mb(1)
    }

    #[test]
    fn test_policy_presets() {
        let production = RotationPolicy::production();
        assert_eq!(production.max_size_mb, 10);
        assert_eq!(production.max_backups, 3);
        assert_eq!(production.max_age_days, 30);
        assert!(!production.compress);
        assert_eq!(production.max_age(), Some(Duration::from_secs(30 * 86_400)));

        let default = RotationPolicy::default();
        assert_eq!(default.max_bytes(), 100 * 1024 * 1024);
        assert_eq!(default.max_age(), None);
    }

    #[test]
    fn test_opens_lazily() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("lazy.log");

        let mut sink = RotatingFileSink::new(&log_path, small_policy());
        assert!(!log_path.exists());

        sink.write_line("first").unwrap();
        sink.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "first\n");
        assert_eq!(sink.current_size(), 6);
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("existing.log");
        fs::write(&log_path, "earlier\n").unwrap();

        let mut sink = RotatingFileSink::new(&log_path, small_policy());
        sink.write_line("later").unwrap();
        sink.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_size_rotation_keeps_max_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let mut sink = RotatingFileSink::new(&log_path, small_policy().with_max_backups(2));

        for i in 0..(3 * 1024 + 1) {
            sink.write_line(&kib_line(i)).unwrap();
        }
        sink.flush().unwrap();

        assert!(log_path.with_file_name("rotation.log.1").exists());
        assert!(log_path.with_file_name("rotation.log.2").exists());
        assert!(!log_path.with_file_name("rotation.log.3").exists());

        let current = fs::read_to_string(&log_path).unwrap();
        assert_eq!(current.lines().count(), 1);
        assert_eq!(current.trim_end(), kib_line(3 * 1024));

        let newest_backup = fs::read_to_string(log_path.with_file_name("rotation.log.1")).unwrap();
        assert_eq!(newest_backup.lines().count(), 1024);
        assert_eq!(newest_backup.lines().next().unwrap(), kib_line(2 * 1024));
    }

    #[test]
    fn test_zero_backups_keeps_all() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("unbounded.log");
        let mut sink = RotatingFileSink::new(&log_path, small_policy().with_max_backups(0));

        for i in 0..(3 * 1024 + 1) {
            sink.write_line(&kib_line(i)).unwrap();
        }
        sink.flush().unwrap();

        for index in 1..=3 {
            assert!(log_path.with_file_name(format!("unbounded.log.{}", index)).exists());
        }
    }

    #[test]
    fn test_existing_full_file_rotates_on_first_write() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("full.log");
        fs::write(&log_path, vec![b'x'; (BYTES_PER_MB - 4) as usize]).unwrap();

        let mut sink = RotatingFileSink::new(&log_path, small_policy().with_max_backups(1));
        sink.write_line("overflow").unwrap();
        sink.flush().unwrap();

        assert!(log_path.with_file_name("full.log.1").exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "overflow\n");
    }

    #[test]
    fn test_oversized_line_is_rejected() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("oversized.log");
        let mut sink = RotatingFileSink::new(&log_path, small_policy());

        let line = "y".repeat(BYTES_PER_MB as usize);
        let err = sink.write_line(&line).unwrap_err();
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
        assert!(!log_path.exists());
    }

    #[test]
    fn test_compressed_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("compressed.log");
        let mut sink = RotatingFileSink::new(
            &log_path,
            small_policy().with_max_backups(2).with_compression(true),
        );

        for i in 0..(2 * 1024 + 1) {
            sink.write_line(&kib_line(i)).unwrap();
        }
        sink.flush().unwrap();

        let gz1 = log_path.with_file_name("compressed.log.1.gz");
        let gz2 = log_path.with_file_name("compressed.log.2.gz");
        assert!(gz1.exists());
        assert!(gz2.exists());
        assert!(!log_path.with_file_name("compressed.log.1").exists());

        let mut decoded = String::new();
        GzDecoder::new(File::open(gz1).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded.lines().count(), 1024);
        assert_eq!(decoded.lines().next().unwrap(), kib_line(1024));
    }

    #[test]
    fn test_expired_backups_are_removed() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("aged.log");
        let recent = log_path.with_file_name("aged.log.1");
        let stale = log_path.with_file_name("aged.log.2");
        fs::write(&recent, "recent\n").unwrap();
        fs::write(&stale, "stale\n").unwrap();

        let forty_days_ago = SystemTime::now() - Duration::from_secs(40 * SECS_PER_DAY);
        File::options()
            .write(true)
            .open(&stale)
            .unwrap()
            .set_modified(forty_days_ago)
            .unwrap();

        let policy = small_policy().with_max_backups(5).with_max_age_days(30);
        let mut sink = RotatingFileSink::new(&log_path, policy);
        for i in 0..=1024 {
            sink.write_line(&kib_line(i)).unwrap();
        }
        sink.flush().unwrap();

        assert!(log_path.with_file_name("aged.log.1").exists());
        assert_eq!(
            fs::read_to_string(log_path.with_file_name("aged.log.2")).unwrap(),
            "recent\n"
        );
        assert!(!log_path.with_file_name("aged.log.3").exists());
    }

    #[test]
    fn test_stale_backups_pruned_on_open() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("restart.log");
        for index in 1..=4 {
            fs::write(log_path.with_file_name(format!("restart.log.{}", index)), "old\n").unwrap();
        }

        let forty_days_ago = SystemTime::now() - Duration::from_secs(40 * SECS_PER_DAY);
        File::options()
            .write(true)
            .open(log_path.with_file_name("restart.log.2"))
            .unwrap()
            .set_modified(forty_days_ago)
            .unwrap();

        let policy = small_policy().with_max_backups(3).with_max_age_days(30);
        let mut sink = RotatingFileSink::new(&log_path, policy);
        sink.write_line("back up").unwrap();

        // No rotation happened, only the open-time prune
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "back up\n");
        assert!(log_path.with_file_name("restart.log.1").exists());
        assert!(!log_path.with_file_name("restart.log.2").exists());
        assert!(log_path.with_file_name("restart.log.3").exists());
        assert!(!log_path.with_file_name("restart.log.4").exists());
    }

    #[test]
    fn test_failed_rotation_keeps_real_size() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("stuck.log");
        let initial = BYTES_PER_MB - 10;
        fs::write(&log_path, vec![b'x'; initial as usize]).unwrap();

        // A directory where the oldest backup goes cannot be removed as a file
        let blocker = log_path.with_file_name("stuck.log.1");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "keep").unwrap();

        let mut sink = RotatingFileSink::new(&log_path, small_policy().with_max_backups(1));
        sink.write_line("rotation blocked").unwrap();
        assert_eq!(sink.current_size(), initial + 17);

        sink.write_line("still appending").unwrap();
        assert_eq!(sink.current_size(), initial + 17 + 16);

        let contents = fs::read(&log_path).unwrap();
        assert_eq!(contents.len() as u64, initial + 17 + 16);
        assert!(contents.ends_with(b"rotation blocked\nstill appending\n"));
        assert!(blocker.is_dir());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_reported_by_write_line() {
        let mut sink = RotatingFileSink::new("/dev/full", small_policy());

        let err = sink.write_line("no space").unwrap_err();
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
        assert_eq!(sink.current_size(), 0);

        // The next line fails on its own rather than succeeding silently
        assert!(sink.write_line("still no space").is_err());
        assert!(sink.flush().is_ok());
    }

    #[test]
    fn test_invalid_policy() {
        assert!(RotationPolicy::new().with_max_size_mb(0).validate().is_err());
        assert!(RotationPolicy::production().validate().is_ok());
    }
}

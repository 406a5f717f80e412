//! The append-only augmentation parameter log.

use crate::common::*;
use log::Level;

/// The timestamp layout of each log line.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// A log handle owned by an augmenter.
///
/// Every event is forwarded to the `log` facade for live visibility. When a
/// file is attached, the event is also appended to it as one timestamped line.
#[derive(Debug)]
pub struct AugmentLog {
    path: Option<PathBuf>,
    writer: Option<Mutex<LineWriter<fs::File>>>,
}

impl AugmentLog {
    /// Opens `path` in append mode, creating it if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file '{}'", path.display()))?;

        Ok(Self {
            path: Some(path.to_owned()),
            writer: Some(Mutex::new(LineWriter::new(file))),
        })
    }

    /// A handle that only forwards to the `log` facade.
    pub fn disabled() -> Self {
        Self {
            path: None,
            writer: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_file_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn info(&self, message: impl fmt::Display) -> Result<()> {
        self.emit(Level::Info, message)
    }

    pub fn warn(&self, message: impl fmt::Display) -> Result<()> {
        self.emit(Level::Warn, message)
    }

    pub fn error(&self, message: impl fmt::Display) -> Result<()> {
        self.emit(Level::Error, message)
    }

    fn emit(&self, level: Level, message: impl fmt::Display) -> Result<()> {
        log::log!(level, "{}", message);

        let writer = match &self.writer {
            Some(writer) => writer,
            None => return Ok(()),
        };
        let line = format!(
            "{} - {} - {}\n",
            Local::now().format(LOG_TIME_FORMAT),
            level_name(level),
            message
        );
        let mut writer = writer
            .lock()
            .map_err(|_| format_err!("augmentation log lock is poisoned"))?;
        writer
            .write_all(line.as_bytes())
            .context("failed to append to augmentation log")?;
        Ok(())
    }
}

/// Level names as written to the log file.
fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

impl Drop for AugmentLog {
    fn drop(&mut self) {
        if let Some(writer) = &self.writer {
            if let Ok(mut writer) = writer.lock() {
                let _ = writer.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn augment_log_appends_lines() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("augment.log");

        {
            let log = AugmentLog::open(&path)?;
            log.info("first")?;
            log.error("second")?;
        }
        {
            let log = AugmentLog::open(&path)?;
            log.warn("third")?;
        }

        let text = fs::read_to_string(&path)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" - INFO - first"));
        assert!(lines[1].ends_with(" - ERROR - second"));
        assert!(lines[2].ends_with(" - WARNING - third"));
        Ok(())
    }

    #[test]
    fn disabled_log_writes_nothing() -> Result<()> {
        let log = AugmentLog::disabled();
        log.info("ignored")?;
        assert!(log.path().is_none());
        assert!(!log.is_file_enabled());
        Ok(())
    }
}

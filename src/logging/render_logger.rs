//! Per-render logger with file and callback output.
//!
//! Each composition build gets its own logger that writes to a dedicated
//! log file and optionally forwards every line to a callback (pipeline
//! progress view, GUI). The build's diagnostic warnings end up here with
//! a `[WARNING]` prefix so a failed measurement is visible in the render
//! log without stopping the render.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use crate::diagnostics::Diagnostics;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Per-render logger with dual output (file + callback).
pub struct RenderLogger {
    /// Render name for identification (used in the log filename).
    render_name: String,
    /// Path to the log file.
    log_path: PathBuf,
    /// File writer (buffered).
    file_writer: Arc<Mutex<Option<BufWriter<File>>>>,
    /// Callback for forwarding lines.
    callback: Arc<Mutex<Option<LogCallback>>>,
    /// Logging configuration.
    config: LogConfig,
}

impl RenderLogger {
    /// Create a new render logger.
    ///
    /// # Arguments
    /// * `render_name` - Name of the render (used in the log filename)
    /// * `log_dir` - Directory to write the log file to
    /// * `config` - Logging configuration
    /// * `callback` - Optional callback for forwarded output
    pub fn new(
        render_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let render_name = render_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&render_name)));
        let file = File::create(&log_path)?;
        let mut file_writer = BufWriter::new(file);

        writeln!(
            file_writer,
            "# Render log for '{}' - {}",
            render_name,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;

        Ok(Self {
            render_name,
            log_path,
            file_writer: Arc::new(Mutex::new(Some(file_writer))),
            callback: Arc::new(Mutex::new(callback)),
            config,
        })
    }

    /// Get the render name.
    pub fn render_name(&self) -> &str {
        &self.render_name
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }

        let line = if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S%.3f"), message)
        } else {
            message.to_string()
        };

        if let Some(writer) = self.file_writer.lock().as_mut() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }

        if let Some(callback) = self.callback.lock().as_ref() {
            callback(&line);
        }
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log a warning message.
    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Log a phase marker.
    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    /// Log a section marker.
    pub fn section(&self, section_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(section_name));
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Write every collected diagnostic warning to the log.
    pub fn diagnostics(&self, diag: &Diagnostics) {
        for warning in diag.warnings() {
            self.warning(&format!("{}: {}", warning.kind, warning.message));
        }
    }

    /// Flush and close the log file.
    pub fn close(&self) {
        if let Some(mut writer) = self.file_writer.lock().take() {
            let _ = writer.flush();
        }
    }
}

/// Replace characters that are unsafe in filenames.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn writes_lines_to_file() {
        let dir = tempdir().unwrap();
        let logger =
            RenderLogger::new("test_render", dir.path(), LogConfig::default(), None).unwrap();

        logger.phase("Resolve");
        logger.info("3 segments measured");
        logger.close();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("=== Resolve ==="));
        assert!(content.contains("3 segments measured"));
    }

    #[test]
    fn filters_below_configured_level() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            level: LogLevel::Warn,
            show_timestamps: false,
        };
        let logger = RenderLogger::new("quiet", dir.path(), config, None).unwrap();

        logger.info("should not appear");
        logger.warning("should appear");
        logger.close();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(!content.contains("should not appear"));
        assert!(content.contains("[WARNING] should appear"));
    }

    #[test]
    fn forwards_lines_to_callback() {
        static COUNT: AtomicUsize = AtomicUsize::new(0);

        let dir = tempdir().unwrap();
        let callback: LogCallback = Box::new(|_| {
            COUNT.fetch_add(1, Ordering::SeqCst);
        });
        let logger =
            RenderLogger::new("cb", dir.path(), LogConfig::default(), Some(callback)).unwrap();

        logger.info("one");
        logger.info("two");

        assert_eq!(COUNT.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn diagnostics_are_written_as_warnings() {
        let dir = tempdir().unwrap();
        let logger = RenderLogger::new("diag", dir.path(), LogConfig::default(), None).unwrap();

        let mut diag = Diagnostics::new();
        diag.warn(WarningKind::MissingMeasurement, "segment 1 unmeasured");
        logger.diagnostics(&diag);
        logger.close();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("[WARNING] missing measurement: segment 1 unmeasured"));
    }

    #[test]
    fn sanitizes_render_name_for_filename() {
        let dir = tempdir().unwrap();
        let logger =
            RenderLogger::new("news/2026:08", dir.path(), LogConfig::default(), None).unwrap();
        assert!(logger.log_path().ends_with("news_2026_08.log"));
    }
}

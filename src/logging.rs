use anyhow::Result;
use chrono::Local;
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::utils::app_paths::AppPaths;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for display under the live table
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone, Default)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        // A poisoned lock only means another thread panicked mid-push; keep logging
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writer that parses compact fmt lines ("LEVEL target: message") into the ring buffer
#[derive(Clone)]
pub struct RingBufferWriter {
    buffer: LogRingBuffer,
}

impl RingBufferWriter {
    pub fn new(buffer: LogRingBuffer) -> Self {
        Self { buffer }
    }

    fn parse_line(line: &str) -> LogEntry {
        let levels = [
            ("TRACE", Level::TRACE),
            ("DEBUG", Level::DEBUG),
            ("INFO", Level::INFO),
            ("WARN", Level::WARN),
            ("ERROR", Level::ERROR),
        ];

        let Some((level, rest)) = levels.iter().find_map(|(name, level)| {
            line.strip_prefix(name)
                .filter(|rest| rest.starts_with(' '))
                .map(|rest| (*level, rest.trim_start()))
        }) else {
            return LogEntry::new(Level::INFO, "general", line.to_string());
        };

        match rest.split_once(':') {
            Some((target, msg)) if !target.contains(' ') => {
                LogEntry::new(level, target, msg.trim().to_string())
            }
            _ => LogEntry::new(level, "general", rest.to_string()),
        }
    }
}

impl std::io::Write for RingBufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(message) = std::str::from_utf8(buf) {
            for line in message.lines().map(str::trim).filter(|l| !l.is_empty()) {
                self.buffer.push(Self::parse_line(line));
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RingBufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// How tracing output is routed
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Filter used when RUST_LOG is unset
    pub level: String,
    /// Append to this file as well
    pub log_file: Option<PathBuf>,
    /// Send console output to an in-memory ring buffer instead of stderr
    pub capture: bool,
}

/// Timestamped log file in the application log directory
pub fn default_log_file() -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(AppPaths::log_dir()?.join(format!("campaign-view_{}.log", timestamp)))
}

/// Install the global subscriber. Returns the ring buffer when output is captured.
pub fn init_tracing(options: &LoggingOptions) -> Result<Option<LogRingBuffer>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&options.level))?;

    let buffer = options.capture.then(LogRingBuffer::new);

    let console_layer = buffer.is_none().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
    });

    let capture_layer = buffer.clone().map(|buffer| {
        fmt::layer()
            .with_writer(RingBufferWriter::new(buffer))
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .without_time() // LogEntry carries its own timestamp
            .compact()
    });

    let file_layer = match &options.log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(open_log_file(path)?))
                .with_target(true)
                .with_ansi(false),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(capture_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(path) = &options.log_file {
        tracing::info!(target: "system", "Logging to {}", path.display());
    }

    Ok(buffer)
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

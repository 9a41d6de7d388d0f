//! Structured logging for the CLI driver.

use crate::config::{LogFormat, LogLevel, LogTarget, LoggingConfig};
use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Structured log event types emitted while encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    /// Per-invocation encode summary, logged once at the end of a run.
    EncodeSummary(EncodeSummaryEvent),
    Info { message: String },
    Warn { message: String },
    Error { message: String, details: Option<String> },
}

impl LogEvent {
    fn level(&self) -> LogLevel {
        match self {
            LogEvent::EncodeSummary(_) => LogLevel::Info,
            LogEvent::Info { .. } => LogLevel::Info,
            LogEvent::Warn { .. } => LogLevel::Warn,
            LogEvent::Error { .. } => LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeSummaryEvent {
    pub timestamp: DateTime<Utc>,
    pub mode: String,
    pub sample_rate: u32,
    pub bit_depth_bits: u8,
    pub vox_enabled: bool,
    pub fskid_enabled: bool,
    pub sample_count: usize,
    pub duration_secs: f64,
    pub wav_path: String,
}

pub struct StructuredLogger {
    config: LoggingConfig,
    writer: Box<dyn Write + Send>,
    start_time: DateTime<Utc>,
}

impl StructuredLogger {
    pub fn new(config: LoggingConfig) -> Result<Self> {
        let writer: Box<dyn Write + Send> = match config.target {
            LogTarget::Stdout => Box::new(io::stdout()),
            LogTarget::Stderr => Box::new(io::stderr()),
            LogTarget::File => {
                let path = config
                    .file_path
                    .as_ref()
                    .ok_or_else(|| color_eyre::eyre::eyre!("file_path required for file logging"))?;
                Box::new(BufWriter::new(File::create(path)?))
            }
        };

        Ok(Self { config, writer, start_time: Utc::now() })
    }

    pub fn log(&mut self, event: LogEvent) -> Result<()> {
        if event.level() < self.config.level {
            return Ok(());
        }

        let output = match self.config.format {
            LogFormat::Json => serde_json::to_string(&event)?,
            LogFormat::Logfmt => self.format_logfmt(&event),
            LogFormat::Pretty => self.format_pretty(&event),
        };

        writeln!(self.writer, "{output}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn format_logfmt(&self, event: &LogEvent) -> String {
        let ts = Utc::now().to_rfc3339();
        match event {
            LogEvent::EncodeSummary(s) => format!(
                "ts=\"{}\" type=encode_summary mode={} sample_rate={} bit_depth={} samples={} duration_secs={:.3} wav=\"{}\"",
                ts, s.mode, s.sample_rate, s.bit_depth_bits, s.sample_count, s.duration_secs, s.wav_path
            ),
            LogEvent::Info { message } => format!("ts=\"{ts}\" level=info msg=\"{message}\""),
            LogEvent::Warn { message } => format!("ts=\"{ts}\" level=warn msg=\"{message}\""),
            LogEvent::Error { message, details } => match details {
                Some(d) => format!("ts=\"{ts}\" level=error msg=\"{message}\" details=\"{d}\""),
                None => format!("ts=\"{ts}\" level=error msg=\"{message}\""),
            },
        }
    }

    fn format_pretty(&self, event: &LogEvent) -> String {
        let ts = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        match event {
            LogEvent::EncodeSummary(s) => format!(
                "[{}] ENCODE {}: {} Hz / {}-bit, {} samples ({:.2}s) -> {}",
                ts, s.mode, s.sample_rate, s.bit_depth_bits, s.sample_count, s.duration_secs, s.wav_path
            ),
            LogEvent::Info { message } => format!("[{ts}] INFO: {message}"),
            LogEvent::Warn { message } => format!("[{ts}] WARN: {message}"),
            LogEvent::Error { message, details } => match details {
                Some(d) => format!("[{ts}] ERROR: {message} | {d}"),
                None => format!("[{ts}] ERROR: {message}"),
            },
        }
    }

    pub fn elapsed(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

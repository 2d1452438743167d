//! Console backend

use super::{parse_config, render_line, CONSOLE};
use crate::core::{Backend, Result, Severity, TimestampFormat};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::io::Write;

/// `{"level": 3, "color": true, "timestamp": "classic"}`; every field optional
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub level: Severity,
    pub color: bool,
    pub timestamp: TimestampFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            level: Severity::Debug,
            color: true,
            timestamp: TimestampFormat::default(),
        }
    }
}

pub struct ConsoleBackend {
    writer: Box<dyn Write + Send>,
    config: ConsoleConfig,
}

impl ConsoleBackend {
    /// Write to stdout
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Write to any stream instead of stdout
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            config: ConsoleConfig::default(),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for ConsoleBackend {
    fn init(&mut self, config: &str) -> Result<()> {
        let config: ConsoleConfig = parse_config(CONSOLE, config)?;
        config.timestamp.validate()?;
        self.config = config;
        Ok(())
    }

    fn write_msg(&mut self, when: DateTime<Local>, msg: &str, level: Severity) -> Result<()> {
        let line = render_line(
            CONSOLE,
            &self.config.timestamp,
            &when,
            msg,
            level,
            self.config.color,
        )?;
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            eprintln!("[DISPATCH ERROR] console flush failed: {}", e);
        }
    }

    fn destroy(&mut self) {
        self.flush();
    }

    fn threshold(&self) -> Severity {
        self.config.level
    }
}

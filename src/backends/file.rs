//! File backend

use super::{parse_config, render_line, FILE};
use crate::core::{Backend, DispatchError, Result, Severity, TimestampFormat};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `{"filename": "app.log", "level": 2, "color": false}`; every field optional
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub filename: PathBuf,
    pub level: Severity,
    pub color: bool,
    pub timestamp: TimestampFormat,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("default.log"),
            level: Severity::Debug,
            color: false,
            timestamp: TimestampFormat::default(),
        }
    }
}

/// Appends lines to a file. The file is opened by `init`.
pub struct FileBackend {
    writer: Option<BufWriter<File>>,
    config: FileConfig,
}

impl FileBackend {
    pub fn new() -> Self {
        Self {
            writer: None,
            config: FileConfig::default(),
        }
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    fn open(path: &Path) -> Result<BufWriter<File>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                DispatchError::config("file", format!("cannot open '{}': {}", path.display(), e))
            })?;
        Ok(BufWriter::new(file))
    }
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for FileBackend {
    fn init(&mut self, config: &str) -> Result<()> {
        let config: FileConfig = parse_config(FILE, config)?;
        config.timestamp.validate()?;
        self.writer = Some(Self::open(&config.filename)?);
        self.config = config;
        Ok(())
    }

    fn write_msg(&mut self, when: DateTime<Local>, msg: &str, level: Severity) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| DispatchError::write("file", "file is not open"))?;

        let line = render_line(
            FILE,
            &self.config.timestamp,
            &when,
            msg,
            level,
            self.config.color,
        )?;
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) {
        if let Some(ref mut writer) = self.writer {
            if let Err(e) = writer.flush() {
                eprintln!(
                    "[DISPATCH ERROR] flush of '{}' failed: {}",
                    self.config.filename.display(),
                    e
                );
            }
        }
    }

    fn destroy(&mut self) {
        self.flush();
        self.writer = None;
    }

    fn threshold(&self) -> Severity {
        self.config.level
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        // detached backends are dropped without destroy
        self.flush();
    }
}

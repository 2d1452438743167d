//! Backends and helpers shared by the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use rust_log_dispatcher::prelude::*;
use serde::Deserialize;
use std::sync::Arc;

/// Everything a [`RecordingBackend`] saw, in call order
#[derive(Debug, Default)]
pub struct Journal {
    pub configs: Vec<String>,
    pub writes: Vec<(Severity, String)>,
    /// Timestamp handed to each write, parallel to `writes`
    pub stamps: Vec<DateTime<Local>>,
    pub flushes: usize,
    pub destroys: usize,
    pub calls_after_destroy: usize,
}

impl Journal {
    pub fn texts(&self) -> Vec<String> {
        self.writes.iter().map(|(_, text)| text.clone()).collect()
    }
}

pub type SharedJournal = Arc<Mutex<Journal>>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordingConfig {
    level: Option<Severity>,
    fail: bool,
}

/// Records every call. `{"level": "error"}` sets its threshold,
/// `{"fail": true}` makes every write return an error.
pub struct RecordingBackend {
    journal: SharedJournal,
    threshold: Severity,
    fail: bool,
    destroyed: bool,
}

impl RecordingBackend {
    pub fn new(journal: SharedJournal) -> Self {
        Self {
            journal,
            threshold: Severity::Debug,
            fail: false,
            destroyed: false,
        }
    }

    fn note_if_destroyed(&self) {
        if self.destroyed {
            self.journal.lock().calls_after_destroy += 1;
        }
    }
}

impl Backend for RecordingBackend {
    fn init(&mut self, config: &str) -> Result<()> {
        self.journal.lock().configs.push(config.to_string());
        if config.trim().is_empty() {
            return Ok(());
        }
        let parsed: RecordingConfig = serde_json::from_str(config)?;
        if let Some(level) = parsed.level {
            self.threshold = level;
        }
        self.fail = parsed.fail;
        Ok(())
    }

    fn write_msg(&mut self, when: DateTime<Local>, msg: &str, level: Severity) -> Result<()> {
        self.note_if_destroyed();
        if self.fail {
            return Err(DispatchError::write("recording", "configured to fail"));
        }
        let mut journal = self.journal.lock();
        journal.writes.push((level, msg.to_string()));
        journal.stamps.push(when);
        Ok(())
    }

    fn flush(&mut self) {
        self.note_if_destroyed();
        self.journal.lock().flushes += 1;
    }

    fn destroy(&mut self) {
        self.note_if_destroyed();
        self.destroyed = true;
        self.journal.lock().destroys += 1;
    }

    fn threshold(&self) -> Severity {
        self.threshold
    }
}

/// Announces each write on `entered`, then waits on `release`.
/// Dropping the release sender opens the gate for good.
pub struct GatedBackend {
    journal: SharedJournal,
    entered: Sender<()>,
    release: Receiver<()>,
}

impl Backend for GatedBackend {
    fn init(&mut self, _config: &str) -> Result<()> {
        Ok(())
    }

    fn write_msg(&mut self, _when: DateTime<Local>, msg: &str, level: Severity) -> Result<()> {
        let _ = self.entered.send(());
        let _ = self.release.recv();
        self.journal.lock().writes.push((level, msg.to_string()));
        Ok(())
    }

    fn flush(&mut self) {
        self.journal.lock().flushes += 1;
    }

    fn destroy(&mut self) {
        self.journal.lock().destroys += 1;
    }
}

/// Display impl that announces it is being rendered, then waits for the
/// go-ahead before writing `text`
pub struct StalledDisplay {
    pub text: &'static str,
    pub rendering: Sender<()>,
    pub proceed: Receiver<()>,
}

impl std::fmt::Display for StalledDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let _ = self.rendering.send(());
        let _ = self.proceed.recv();
        f.write_str(self.text)
    }
}

/// Registry where `name` builds a [`RecordingBackend`] writing to `journal`
pub fn register_recorder(registry: &Registry, name: &str, journal: &SharedJournal) {
    let journal = Arc::clone(journal);
    registry
        .register(name, move || Box::new(RecordingBackend::new(Arc::clone(&journal))))
        .expect("fresh name");
}

/// Collected `(backend, error)` pairs from the diagnostic channel
pub type Failures = Arc<Mutex<Vec<(String, String)>>>;

pub fn collecting_handler(failures: &Failures) -> ErrorHandler {
    let failures = Arc::clone(failures);
    Arc::new(move |name: &str, err: &DispatchError| {
        failures.lock().push((name.to_string(), err.to_string()));
    })
}

/// Dispatcher whose default `console` backend is a recorder
pub fn recording_dispatcher() -> (Dispatcher, SharedJournal) {
    let journal = SharedJournal::default();
    let registry = Registry::new();
    register_recorder(&registry, "console", &journal);

    let dispatcher = Dispatcher::builder()
        .registry(Arc::new(registry))
        .error_handler(Arc::new(|_: &str, _: &DispatchError| {}))
        .build();
    (dispatcher, journal)
}

/// Dispatcher with a single gated backend and no console
pub fn gated_dispatcher(
    queue_capacity: usize,
) -> (Arc<Dispatcher>, SharedJournal, Receiver<()>, Sender<()>) {
    let journal = SharedJournal::default();
    let (entered_tx, entered_rx) = crossbeam_channel::unbounded();
    let (release_tx, release_rx) = crossbeam_channel::unbounded();

    let registry = Registry::new();
    let sink = Arc::clone(&journal);
    registry
        .register("gated", move || {
            Box::new(GatedBackend {
                journal: Arc::clone(&sink),
                entered: entered_tx.clone(),
                release: release_rx.clone(),
            })
        })
        .expect("fresh name");

    let dispatcher = Dispatcher::builder()
        .registry(Arc::new(registry))
        .default_console(false)
        .queue_capacity(queue_capacity)
        .build();
    dispatcher.attach("gated", "").expect("gated backend attaches");

    (Arc::new(dispatcher), journal, entered_rx, release_tx)
}

//! The dispatcher: one front door for leveled messages, fanned out to every
//! attached backend either on the calling thread or through a single
//! delivery worker.

use super::{
    backend::BackendEntry,
    envelope::EnvelopePool,
    error::{DispatchError, Result},
    metrics::DispatchMetrics,
    registry::Registry,
    severity::Severity,
    state::{stderr_error_handler, ErrorHandler, Lifecycle, Reporter, State},
    worker::{Command, Worker},
};
use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, SendError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::fmt::{self, Write as _};
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;

/// Queue capacity used when none (or zero) is given
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Name of the console backend attached to every new dispatcher
pub const DEFAULT_BACKEND: &str = "console";

/// Queue, pool and worker that exist once the dispatcher goes async
pub(crate) struct AsyncQueue {
    sender: Sender<Command>,
    pool: Arc<EnvelopePool>,
    /// One control command (flush/close) in flight at a time
    control: Mutex<()>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

pub(crate) struct Shared {
    /// Backend list and queue capacity. Also serializes mode changes.
    pub(crate) state: Mutex<State>,
    /// Set once, under `state`, when the dispatcher goes async
    queue: OnceLock<AsyncQueue>,
    threshold: AtomicU8,
    lifecycle: AtomicU8,
    /// Producers between their open check and the end of their send
    producers: AtomicUsize,
    prefix: RwLock<String>,
    call_site: AtomicBool,
    registry: Arc<Registry>,
    pub(crate) reporter: Reporter,
}

impl Shared {
    // Lifecycle and `producers` are both SeqCst: a producer registers and
    // then checks the lifecycle, the worker closes and then checks
    // `producers`, and one of the two must see the other.
    pub(crate) fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_u8(self.lifecycle.load(Ordering::SeqCst))
    }

    pub(crate) fn set_lifecycle(&self, lifecycle: Lifecycle) {
        self.lifecycle.store(lifecycle as u8, Ordering::SeqCst);
    }

    pub(crate) fn active_producers(&self) -> usize {
        self.producers.load(Ordering::SeqCst)
    }

    fn is_open(&self) -> bool {
        self.lifecycle() == Lifecycle::Open
    }

    /// `Open -> Closing`; false if someone else got there first
    fn begin_close(&self) -> bool {
        self.lifecycle
            .compare_exchange(
                Lifecycle::Open as u8,
                Lifecycle::Closing as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }
}

/// Counts a producer as active for as long as it lives
struct ProducerGuard<'a>(&'a AtomicUsize);

impl<'a> ProducerGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ProducerGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// # Example
///
/// ```
/// use rust_log_dispatcher::{info, Dispatcher, Severity};
///
/// let dispatcher = Dispatcher::new();
/// dispatcher.set_threshold(Severity::Info);
/// info!(dispatcher, "listening on port {}", 8080);
///
/// dispatcher.go_async(Some(1000));
/// info!(dispatcher, "now delivered by the worker");
/// dispatcher.flush();
/// dispatcher.close();
/// ```
pub struct Dispatcher {
    shared: Arc<Shared>,
}

impl Dispatcher {
    /// Synchronous dispatcher at threshold Debug, bundled backends
    /// registered, console backend attached.
    #[must_use]
    pub fn new() -> Self {
        DispatcherBuilder::new().build()
    }

    /// Like [`Dispatcher::new`] with the queue capacity used once async
    #[must_use]
    pub fn with_capacity(queue_capacity: usize) -> Self {
        DispatcherBuilder::new().queue_capacity(queue_capacity).build()
    }

    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    // ---- backends -------------------------------------------------------

    /// Construct the backend registered as `name`, initialize it with
    /// `config` and append it to the fan-out list.
    ///
    /// Nothing is attached on error. Init failures are also reported to
    /// the diagnostic handler.
    pub fn attach(&self, name: &str, config: &str) -> Result<()> {
        let mut state = self.shared.state.lock();
        if !self.shared.is_open() {
            return Err(DispatchError::Closed);
        }
        if state.contains(name) {
            return Err(DispatchError::duplicate_backend(name));
        }

        let mut backend = self.shared.registry.construct(name)?;
        if let Err(e) = backend.init(config) {
            let err = DispatchError::init(name, e);
            self.shared.reporter.report(name, &err);
            return Err(err);
        }

        state.backends.push(BackendEntry::new(name, backend));
        Ok(())
    }

    /// Remove the backend attached as `name`. Absent names are ignored.
    ///
    /// The backend is dropped without `destroy`; only `close` tears
    /// backends down.
    pub fn detach(&self, name: &str) {
        let mut state = self.shared.state.lock();
        if let Some(idx) = state.backends.iter().position(|entry| entry.name == name) {
            state.backends.remove(idx);
        }
    }

    /// Attached backend names, in fan-out order
    pub fn backend_names(&self) -> Vec<String> {
        self.shared
            .state
            .lock()
            .backends
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    // ---- configuration --------------------------------------------------

    pub fn set_threshold(&self, level: Severity) {
        self.shared.threshold.store(level as u8, Ordering::Relaxed);
    }

    pub fn threshold(&self) -> Severity {
        Severity::from_u8(self.shared.threshold.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Text placed in front of every message body
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        *self.shared.prefix.write() = prefix.into();
    }

    /// Tag every message with the `[file:line]` of the logging call
    pub fn set_call_site(&self, enabled: bool) {
        self.shared.call_site.store(enabled, Ordering::Relaxed);
    }

    pub fn is_async(&self) -> bool {
        self.shared.queue.get().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lifecycle() == Lifecycle::Closed
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.lifecycle()
    }

    pub fn queue_capacity(&self) -> usize {
        self.shared.state.lock().queue_capacity
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.shared.reporter.metrics
    }

    /// Envelope pool of the async path, if the dispatcher is async
    pub fn envelope_pool(&self) -> Option<&EnvelopePool> {
        self.shared.queue.get().map(|queue| queue.pool.as_ref())
    }

    // ---- write path -----------------------------------------------------

    /// Log `args` at `level`. Never fails and never reports to the caller.
    #[track_caller]
    pub fn log(&self, level: Severity, args: fmt::Arguments<'_>) {
        if !level.passes(self.threshold()) {
            self.shared.reporter.metrics.record_filtered();
            return;
        }
        self.dispatch(level, Location::caller(), args);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, args);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warning, args);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, args);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, args);
    }

    fn dispatch(&self, level: Severity, location: &Location<'_>, args: fmt::Arguments<'_>) {
        if !self.shared.is_open() {
            self.shared.reporter.metrics.record_dropped_after_close();
            return;
        }

        if let Some(queue) = self.shared.queue.get() {
            self.enqueue(queue, level, Local::now(), |buf| {
                self.render(buf, level, location, args)
            });
            return;
        }

        let when = Local::now();
        let mut text = String::new();
        self.render(&mut text, level, location, args);

        let mut state = self.shared.state.lock();
        if !self.shared.is_open() {
            self.shared.reporter.metrics.record_dropped_after_close();
            return;
        }
        // went async while we were rendering
        if let Some(queue) = self.shared.queue.get() {
            drop(state);
            self.enqueue(queue, level, when, |buf| buf.push_str(&text));
            return;
        }
        state.deliver_to_all(when, &text, level, &self.shared.reporter);
    }

    /// `<marker> [file:line] <prefix> <message>`
    fn render(
        &self,
        buf: &mut String,
        level: Severity,
        location: &Location<'_>,
        args: fmt::Arguments<'_>,
    ) {
        buf.push_str(level.marker());
        buf.push(' ');

        if self.shared.call_site.load(Ordering::Relaxed) {
            let file = Path::new(location.file())
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("???");
            let _ = write!(buf, "[{}:{}] ", file, location.line());
        }

        {
            let prefix = self.shared.prefix.read();
            if !prefix.is_empty() {
                buf.push_str(&prefix);
                buf.push(' ');
            }
        }

        let _ = buf.write_fmt(args);
    }

    /// Fill a pooled envelope and push it, blocking while the queue is full
    fn enqueue(
        &self,
        queue: &AsyncQueue,
        level: Severity,
        when: DateTime<Local>,
        fill: impl FnOnce(&mut String),
    ) {
        let _producer = ProducerGuard::enter(&self.shared.producers);
        if !self.shared.is_open() {
            self.shared.reporter.metrics.record_dropped_after_close();
            return;
        }

        let mut envelope = queue.pool.acquire(level, when);
        fill(envelope.text_buf());

        let command = match queue.sender.try_send(Command::Deliver(envelope)) {
            Ok(()) => return,
            Err(TrySendError::Full(command)) => {
                self.shared.reporter.metrics.record_queue_full();
                command
            }
            Err(TrySendError::Disconnected(command)) => {
                self.discard(queue, command);
                return;
            }
        };

        if let Err(SendError(command)) = queue.sender.send(command) {
            self.discard(queue, command);
        }
    }

    fn discard(&self, queue: &AsyncQueue, command: Command) {
        if let Command::Deliver(envelope) = command {
            self.shared.reporter.metrics.record_dropped_after_close();
            queue.pool.release(envelope);
        }
    }

    // ---- lifecycle ------------------------------------------------------

    /// Switch to asynchronous delivery. One-way; calling it again, or after
    /// close, changes nothing.
    ///
    /// `queue_len` overrides the queue capacity when it is non-zero.
    pub fn go_async(&self, queue_len: Option<usize>) -> &Self {
        let mut state = self.shared.state.lock();
        if self.shared.queue.get().is_some() || !self.shared.is_open() {
            return self;
        }

        if let Some(len) = queue_len.filter(|len| *len > 0) {
            state.queue_capacity = len;
        }

        let (sender, receiver) = bounded(state.queue_capacity);
        let pool = Arc::new(EnvelopePool::new(state.queue_capacity));
        let worker = Worker::new(Arc::clone(&self.shared), Arc::clone(&pool), receiver);

        let handle = match worker.make_thread() {
            Ok(handle) => handle,
            Err(e) => {
                eprintln!(
                    "[DISPATCH CRITICAL] Failed to spawn delivery worker: {}. \
                     Staying synchronous.",
                    e
                );
                return self;
            }
        };

        let queue = AsyncQueue {
            sender,
            pool,
            control: Mutex::new(()),
            worker: Mutex::new(Some(handle)),
        };
        if self.shared.queue.set(queue).is_err() {
            // unreachable while `state` is held
            eprintln!("[DISPATCH ERROR] Async queue was already installed");
        }
        self
    }

    /// Block until every message logged before this call has reached every
    /// backend, then flush all backends.
    pub fn flush(&self) {
        let Some(queue) = self.shared.queue.get() else {
            let mut state = self.shared.state.lock();
            if self.shared.is_open() {
                state.flush_all(&self.shared.reporter);
            }
            return;
        };

        let _control = queue.control.lock();
        if !self.shared.is_open() {
            return;
        }
        let (done, wait) = bounded(1);
        if queue.sender.send(Command::Flush(done)).is_ok() {
            let _ = wait.recv();
        }
    }

    /// Deliver everything pending, flush and destroy every backend, stop the
    /// worker. The dispatcher stays usable but inert afterwards. Calling it
    /// again does nothing.
    pub fn close(&self) {
        let queue = {
            let mut state = self.shared.state.lock();
            if !self.shared.begin_close() {
                return;
            }
            match self.shared.queue.get() {
                Some(queue) => queue,
                None => {
                    state.close_all(&self.shared.reporter);
                    self.shared.set_lifecycle(Lifecycle::Closed);
                    return;
                }
            }
        };

        {
            let _control = queue.control.lock();
            let (done, wait) = bounded(1);
            if queue.sender.send(Command::Close(done)).is_ok() {
                let _ = wait.recv();
            }
        }

        if let Some(handle) = queue.worker.lock().take() {
            if let Err(e) = handle.join() {
                eprintln!("[DISPATCH ERROR] Delivery worker panicked: {:?}", e);
            }
        }
        self.shared.set_lifecycle(Lifecycle::Closed);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("threshold", &self.threshold())
            .field("async", &self.is_async())
            .field("lifecycle", &self.lifecycle())
            .field("backends", &self.backend_names())
            .finish()
    }
}

/// Builder for constructing a [`Dispatcher`]
///
/// # Example
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::builder()
///     .registry(Arc::new(Registry::with_builtins()))
///     .threshold(Severity::Info)
///     .queue_capacity(1000)
///     .prefix("[api]")
///     .call_site(true)
///     .build();
/// ```
pub struct DispatcherBuilder {
    registry: Option<Arc<Registry>>,
    threshold: Severity,
    queue_capacity: usize,
    prefix: String,
    call_site: bool,
    default_console: bool,
    on_error: Option<ErrorHandler>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            threshold: Severity::Debug,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            prefix: String::new(),
            call_site: false,
            default_console: true,
            on_error: None,
        }
    }

    /// Registry to construct backends from. Defaults to
    /// [`Registry::with_builtins`].
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: Severity) -> Self {
        self.threshold = level;
        self
    }

    /// Capacity of the async queue; zero keeps the default
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        if capacity > 0 {
            self.queue_capacity = capacity;
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn call_site(mut self, enabled: bool) -> Self {
        self.call_site = enabled;
        self
    }

    /// Attach the `console` backend at build time (default: true)
    #[must_use = "builder methods return a new value"]
    pub fn default_console(mut self, enabled: bool) -> Self {
        self.default_console = enabled;
        self
    }

    /// Where per-backend failures go. Defaults to stderr.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatcher::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let dispatcher = Dispatcher::builder()
    ///     .error_handler(Arc::new(|name: &str, err: &DispatchError| {
    ///         eprintln!("sink {} is unhappy: {}", name, err);
    ///     }))
    ///     .build();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn error_handler(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    pub fn build(self) -> Dispatcher {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(Registry::with_builtins()));

        let shared = Shared {
            state: Mutex::new(State::new(self.queue_capacity)),
            queue: OnceLock::new(),
            threshold: AtomicU8::new(self.threshold as u8),
            lifecycle: AtomicU8::new(Lifecycle::Open as u8),
            producers: AtomicUsize::new(0),
            prefix: RwLock::new(self.prefix),
            call_site: AtomicBool::new(self.call_site),
            registry,
            reporter: Reporter::new(self.on_error.unwrap_or_else(stderr_error_handler)),
        };
        let dispatcher = Dispatcher {
            shared: Arc::new(shared),
        };

        if self.default_console {
            // already reported through the handler on failure
            let _ = dispatcher.attach(DEFAULT_BACKEND, "");
        }
        dispatcher
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

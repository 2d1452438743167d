//! The delivery worker behind an asynchronous dispatcher
//!
//! Exactly one worker exists per dispatcher, spawned by
//! [`Dispatcher::go_async`](super::Dispatcher::go_async). It drains a single
//! FIFO channel carrying both messages and control commands, so a `Flush`
//! naturally lands behind every message enqueued before it.

use super::dispatcher::Shared;
use super::envelope::{Envelope, EnvelopePool};
use super::state::Lifecycle;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub(crate) const WORKER_THREAD_NAME: &str = "log-dispatch-worker";

/// How long the closed worker parks between checks for late producers
const LATE_PRODUCER_POLL: Duration = Duration::from_millis(5);

#[derive(Debug)]
pub(crate) enum Command {
    Deliver(Envelope),
    /// Drain, flush every backend, then ack
    Flush(Sender<()>),
    /// Drain, flush and destroy every backend, ack, then stop
    Close(Sender<()>),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum WorkerState {
    Running,
    Flushing,
    Closed,
}

pub(crate) struct Worker {
    shared: Arc<Shared>,
    pool: Arc<EnvelopePool>,
    receiver: Receiver<Command>,
    state: WorkerState,
}

impl Worker {
    pub(crate) fn new(
        shared: Arc<Shared>,
        pool: Arc<EnvelopePool>,
        receiver: Receiver<Command>,
    ) -> Self {
        Self {
            shared,
            pool,
            receiver,
            state: WorkerState::Running,
        }
    }

    pub(crate) fn make_thread(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run())
    }

    fn run(mut self) {
        while self.state != WorkerState::Closed {
            match self.receiver.recv() {
                Ok(command) => self.handle(command),
                Err(_) => break,
            }
        }
        self.discard_remaining();
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Deliver(envelope) => self.deliver(envelope),
            Command::Flush(done) => {
                self.state = WorkerState::Flushing;
                let stray_acks = self.drain_pending();
                self.shared.state.lock().flush_all(&self.shared.reporter);
                Self::ack(done);
                stray_acks.into_iter().for_each(Self::ack);
                self.state = WorkerState::Running;
            }
            Command::Close(done) => {
                let stray_acks = self.drain_pending();
                self.shared.state.lock().close_all(&self.shared.reporter);
                self.shared.set_lifecycle(Lifecycle::Closed);
                self.state = WorkerState::Closed;
                Self::ack(done);
                stray_acks.into_iter().for_each(Self::ack);
            }
        }
    }

    fn deliver(&self, envelope: Envelope) {
        self.shared.state.lock().deliver_to_all(
            envelope.timestamp(),
            envelope.text(),
            envelope.level(),
            &self.shared.reporter,
        );
        self.pool.release(envelope);
    }

    /// Deliver whatever is queued right now. Bounded by the current queue
    /// length so a steady stream of producers cannot stall a flush.
    ///
    /// Control commands are serialized by the dispatcher's control lock, so
    /// none should be found here; any that are get acked by the caller.
    fn drain_pending(&mut self) -> Vec<Sender<()>> {
        let mut stray_acks = Vec::new();
        for _ in 0..self.receiver.len() {
            match self.receiver.try_recv() {
                Ok(Command::Deliver(envelope)) => self.deliver(envelope),
                Ok(Command::Flush(done)) | Ok(Command::Close(done)) => stray_acks.push(done),
                Err(_) => break,
            }
        }
        stray_acks
    }

    /// After close: return everything still queued, or still being sent by
    /// producers that got in before the close, to the pool undelivered
    fn discard_remaining(&mut self) {
        loop {
            while let Ok(command) = self.receiver.try_recv() {
                self.discard(command);
            }
            if self.shared.active_producers() == 0 && self.receiver.is_empty() {
                break;
            }
            match self.receiver.recv_timeout(LATE_PRODUCER_POLL) {
                Ok(command) => self.discard(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn discard(&self, command: Command) {
        match command {
            Command::Deliver(envelope) => {
                self.shared.reporter.metrics.record_dropped_after_close();
                self.pool.release(envelope);
            }
            Command::Flush(done) | Command::Close(done) => Self::ack(done),
        }
    }

    fn ack(done: Sender<()>) {
        // The waiting side may have gone away; nothing to do then.
        let _ = done.send(());
    }
}

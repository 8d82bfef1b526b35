//! Per-channel repeating evaluation tasks.
//!
//! The scheduler owns one cancellable task per channel. Activating a
//! channel fires an immediate initial tick, then a background thread ticks
//! at the configured period until the channel is deactivated or the
//! scheduler is dropped. Contexts live in a [`ChannelRegistry`]; a tick
//! takes its channel's context out, runs the pure [`evaluate`] step, and
//! stores the update back, so at most one evaluation per channel is ever in
//! flight.

use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use serde_json::Value;

use crate::astro::source::InstantSource;
use crate::engine::context::{ChannelRegistry, EvaluationContext};
use crate::engine::evaluate::{DEFAULT_STEP_MS, TickKind, evaluate};
use crate::foundation::diag::Severity;

/// Receiver of engine output and status updates.
///
/// `emit` gets the augmented record for each emitting tick. `status`
/// carries the tri-state severity and the short status line; `None` means
/// any previously shown status should be cleared.
pub trait OutputSink: Send + Sync {
    /// Deliver one augmented output record for a channel.
    fn emit(&self, topic: &str, message: Value);

    /// Report (or clear) the channel status line.
    fn status(&self, topic: &str, severity: Severity, message: Option<&str>) {
        let _ = (topic, severity, message);
    }
}

impl<F> OutputSink for F
where
    F: Fn(&str, Value) + Send + Sync,
{
    fn emit(&self, topic: &str, message: Value) {
        self(topic, message);
    }
}

struct Shared {
    source: Arc<dyn InstantSource + Send + Sync>,
    sink: Arc<dyn OutputSink>,
    registry: Mutex<ChannelRegistry>,
}

struct Task {
    cancel: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

/// Owns the repeating evaluation task of every active channel.
pub struct Scheduler {
    shared: Arc<Shared>,
    tasks: HashMap<String, Task>,
    period: StdDuration,
}

impl Scheduler {
    /// Scheduler with the default 5000 ms period.
    pub fn new(
        source: Arc<dyn InstantSource + Send + Sync>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self::with_period(source, sink, StdDuration::from_millis(DEFAULT_STEP_MS))
    }

    /// Scheduler with an explicit tick period.
    pub fn with_period(
        source: Arc<dyn InstantSource + Send + Sync>,
        sink: Arc<dyn OutputSink>,
        period: StdDuration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared { source, sink, registry: Mutex::new(ChannelRegistry::new()) }),
            tasks: HashMap::new(),
            period,
        }
    }

    /// Start (or restart) the repeating task for a channel.
    ///
    /// Any previous task for the same channel is canceled first. The initial
    /// tick runs synchronously before this returns; `record` is retained and
    /// re-augmented on every emitting tick.
    #[tracing::instrument(skip(self, ctx, record), fields(topic = %ctx.topic))]
    pub fn activate(&mut self, ctx: EvaluationContext, record: Value) {
        let topic = ctx.topic.clone();
        self.deactivate(&topic);

        {
            let mut registry = lock_registry(&self.shared.registry);
            let enabled = registry.apply_enabled(&topic, None);
            let mut ctx = ctx;
            ctx.enabled = enabled;
            registry.activate(ctx);
        }

        let step = Duration::milliseconds(self.period.as_millis() as i64);
        run_tick(&self.shared, &topic, &record, TickKind::Initial, step);

        let (cancel, cancel_rx) = mpsc::channel();
        let shared = Arc::clone(&self.shared);
        let period = self.period;
        let thread_topic = topic.clone();
        let handle = thread::spawn(move || {
            loop {
                match cancel_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !run_tick(&shared, &thread_topic, &record, TickKind::Recurring, step) {
                            tracing::debug!(topic = %thread_topic, "context gone; stopping task");
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        self.tasks.insert(topic, Task { cancel, handle });
    }

    /// Cancel a channel's task and drop its context. The persisted enabled
    /// flag survives for a later reactivation.
    pub fn deactivate(&mut self, topic: &str) {
        if let Some(task) = self.tasks.remove(topic) {
            let _ = task.cancel.send(());
            let _ = task.handle.join();
        }
        lock_registry(&self.shared.registry).deactivate(topic);
    }

    /// Update a channel's enabled flag; returns the effective value.
    pub fn set_enabled(&self, topic: &str, enabled: bool) -> bool {
        lock_registry(&self.shared.registry).apply_enabled(topic, Some(enabled))
    }

    /// Persisted enabled flag, defaulting to `true` on first use.
    pub fn enabled_or_default(&self, topic: &str) -> bool {
        lock_registry(&self.shared.registry).apply_enabled(topic, None)
    }

    /// Whether a repeating task is currently running for the channel.
    pub fn is_active(&self, topic: &str) -> bool {
        self.tasks.contains_key(topic)
    }

    /// Forward a status update to the sink.
    pub fn report_status(&self, topic: &str, severity: Severity, message: Option<&str>) {
        self.shared.sink.status(topic, severity, message);
    }

    /// Cancel every channel task.
    pub fn shutdown(&mut self) {
        let topics: Vec<String> = self.tasks.keys().cloned().collect();
        for topic in topics {
            self.deactivate(&topic);
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock_registry(registry: &Mutex<ChannelRegistry>) -> MutexGuard<'_, ChannelRegistry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run one tick for a channel. False when the channel's context is gone
/// (the task should stop).
fn run_tick(shared: &Shared, topic: &str, record: &Value, kind: TickKind, step: Duration) -> bool {
    let ctx = lock_registry(&shared.registry).take(topic);
    let Some(ctx) = ctx else {
        return false;
    };

    let (ctx, output) = evaluate(ctx, shared.source.as_ref(), Utc::now(), kind, step);
    lock_registry(&shared.registry).store(ctx);

    if let Some(output) = output {
        shared.sink.emit(topic, output.augment(record));
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scheduler.rs"]
mod tests;

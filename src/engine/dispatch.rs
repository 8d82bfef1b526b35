use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;
use serde_json::Value;

use crate::astro::source::InstantSource;
use crate::engine::evaluate::setup;
use crate::engine::scheduler::{OutputSink, Scheduler};
use crate::foundation::diag::Diagnostics;
use crate::foundation::error::LuxResult;
use crate::validate::activation::parse_activation;

/// What the transport should do with the original record after [`Engine::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// No lifecycle change was requested; forward the record untouched.
    PassThrough,
    /// The channel was (re)activated; outputs flow through the sink.
    Activated,
    /// The channel was stopped; forward the record untouched.
    Deactivated,
}

/// Top-level dispatch over input records.
///
/// Applies the activation signals of each record: updates the persisted
/// enabled flag, runs the full validation pipeline on activation, and
/// starts/stops the channel's repeating task. Status updates (including the
/// cleared status of a fully clean record) are forwarded to the sink.
pub struct Engine {
    source: Arc<dyn InstantSource + Send + Sync>,
    scheduler: Scheduler,
}

impl Engine {
    /// Engine with the default tick period.
    pub fn new(source: Arc<dyn InstantSource + Send + Sync>, sink: Arc<dyn OutputSink>) -> Self {
        let scheduler = Scheduler::new(Arc::clone(&source), sink);
        Self { source, scheduler }
    }

    /// Engine with an explicit tick period.
    pub fn with_period(
        source: Arc<dyn InstantSource + Send + Sync>,
        sink: Arc<dyn OutputSink>,
        period: StdDuration,
    ) -> Self {
        let scheduler = Scheduler::with_period(Arc::clone(&source), sink, period);
        Self { source, scheduler }
    }

    /// Process one input record.
    ///
    /// Fatal validation errors leave the channel's prior state unchanged and
    /// are returned to the caller; `diag` carries warnings and the status
    /// line in every case.
    #[tracing::instrument(skip(self, record, diag))]
    pub fn handle(&mut self, record: &Value, diag: &mut Diagnostics) -> LuxResult<Disposition> {
        let activation = parse_activation(record);
        let topic = activation.topic.clone();

        if let Some(enabled) = activation.enabled {
            self.scheduler.set_enabled(&topic, enabled);
        } else {
            self.scheduler.enabled_or_default(&topic);
        }

        let disposition = match activation.activate {
            None => Ok(Disposition::PassThrough),
            Some(true) => setup(record, &topic, self.source.as_ref(), Utc::now(), diag).map(|ctx| {
                self.scheduler.activate(ctx, record.clone());
                Disposition::Activated
            }),
            Some(false) => {
                self.scheduler.deactivate(&topic);
                Ok(Disposition::Deactivated)
            }
        };

        self.scheduler.report_status(&topic, diag.severity(), diag.status());
        disposition
    }

    /// The underlying per-channel scheduler.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Stop all channel tasks.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/dispatch.rs"]
mod tests;

use std::collections::HashMap;

use chrono::Duration;
use serde_json::Value;

use crate::levels::attrs::Levels;
use crate::validate::fades::Anchor;
use crate::validate::location::Location;

/// Per-channel evaluation state.
///
/// Created when a channel is first activated, mutated on every tick, and
/// dropped when the channel is explicitly deactivated. Each context is owned
/// by exactly one channel; channels never share state.
#[derive(Clone, Debug)]
pub struct EvaluationContext {
    /// Channel identifier.
    pub topic: String,
    /// Whether output is currently emitted for this channel.
    pub enabled: bool,
    /// Validated location, fixed for the lifetime of the activation.
    pub location: Location,
    /// Offset applied to the system clock to simulate "now".
    pub now_offset: Duration,
    /// The raw fade list as received, retained for window refreshes.
    pub raw_record: Value,
    /// Validated anchors, in insertion order.
    pub anchors: Vec<Anchor>,
    /// Index of the anchor with the latest `before` not after now.
    pub closest_before: usize,
    /// Index of the anchor with the earliest `after` not before now.
    pub closest_after: usize,
    /// Last emitted value set, used to suppress unchanged output.
    pub last_data: Option<Levels>,
}

/// Explicit registry of per-channel state.
///
/// Owns each channel's [`EvaluationContext`] and its persisted enabled flag.
/// The enabled flag outlives activations (a channel disabled while stopped
/// stays disabled when restarted) and defaults to `true` on first use.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    contexts: HashMap<String, EvaluationContext>,
    enabled: HashMap<String, bool>,
}

impl ChannelRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an optional enabled-flag update and return the effective value.
    ///
    /// First use of a channel creates the flag as `true`. An active
    /// context's own flag is kept in sync.
    pub fn apply_enabled(&mut self, topic: &str, update: Option<bool>) -> bool {
        let flag = self.enabled.entry(topic.to_string()).or_insert(true);
        if let Some(v) = update {
            *flag = v;
        }
        let effective = *flag;
        if let Some(ctx) = self.contexts.get_mut(topic) {
            ctx.enabled = effective;
        }
        effective
    }

    /// Persisted enabled flag without mutating (absent reads as `true`).
    pub fn is_enabled(&self, topic: &str) -> bool {
        self.enabled.get(topic).copied().unwrap_or(true)
    }

    /// Install (or replace) the context for its channel.
    pub fn activate(&mut self, ctx: EvaluationContext) {
        self.contexts.insert(ctx.topic.clone(), ctx);
    }

    /// Remove a channel's context. The persisted enabled flag survives.
    pub fn deactivate(&mut self, topic: &str) -> Option<EvaluationContext> {
        self.contexts.remove(topic)
    }

    /// Take a channel's context out for a tick. Pair with [`Self::store`].
    pub fn take(&mut self, topic: &str) -> Option<EvaluationContext> {
        self.contexts.remove(topic)
    }

    /// Put a ticked context back.
    pub fn store(&mut self, ctx: EvaluationContext) {
        self.contexts.insert(ctx.topic.clone(), ctx);
    }

    /// Borrow a channel's context.
    pub fn get(&self, topic: &str) -> Option<&EvaluationContext> {
        self.contexts.get(topic)
    }

    /// Number of channels with an active context.
    pub fn active_len(&self) -> usize {
        self.contexts.len()
    }
}

//! The pure per-tick evaluation step.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

use crate::astro::source::InstantSource;
use crate::engine::context::EvaluationContext;
use crate::engine::output::EvalOutput;
use crate::foundation::diag::Diagnostics;
use crate::foundation::error::{LuxError, LuxResult};
use crate::levels::attrs::Levels;
use crate::validate::fades::{Anchor, validate_fades};
use crate::validate::location::parse_location;
use crate::validate::now_override::parse_now_offset;

/// Default tick period in milliseconds.
pub const DEFAULT_STEP_MS: u64 = 5000;

/// Whether a tick is the immediate one fired on activation or a recurring
/// timer tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickKind {
    /// First tick, fired immediately on activation. Always emits; carries no
    /// transition duration.
    Initial,
    /// Periodic tick. Emits only on change; carries the step interval as the
    /// transition duration.
    Recurring,
}

/// Run the full validation pipeline over an input record and build a fresh
/// channel context.
///
/// Order matters: the now override is resolved first (a bad one only warns),
/// then the location (fatal on failure), then the fade list against the
/// instant table for the effective "now". The channel's prior state is
/// untouched on any fatal error.
#[tracing::instrument(skip(record, source, diag), fields(topic = topic))]
pub fn setup(
    record: &Value,
    topic: &str,
    source: &dyn InstantSource,
    system_now: DateTime<Utc>,
    diag: &mut Diagnostics,
) -> LuxResult<EvaluationContext> {
    let now_offset = parse_now_offset(record, system_now, diag);
    let now = system_now + now_offset;

    let location = parse_location(record, diag)?;
    let instants = source.named_instants(now.date_naive(), location);
    let anchors = validate_fades(record, &instants, now, diag)?;
    let (closest_before, closest_after) = select_brackets(&anchors)
        .ok_or_else(|| LuxError::fades("no bracket pair selectable"))?;

    Ok(EvaluationContext {
        topic: topic.to_string(),
        enabled: true,
        location,
        now_offset,
        raw_record: json!({ "fades": record.get("fades").cloned().unwrap_or(Value::Null) }),
        anchors,
        closest_before,
        closest_after,
        last_data: None,
    })
}

/// Select the active bracket pair: the anchor whose `before` is latest
/// (ties: last element wins) and the anchor whose `after` is earliest
/// (ties: first element wins).
pub fn select_brackets(anchors: &[Anchor]) -> Option<(usize, usize)> {
    let mut before: Option<usize> = None;
    let mut after: Option<usize> = None;
    for (i, anchor) in anchors.iter().enumerate() {
        if before.is_none_or(|b| anchors[b].before <= anchor.before) {
            before = Some(i);
        }
        if after.is_none_or(|a| anchors[a].after > anchor.after) {
            after = Some(i);
        }
    }
    before.zip(after)
}

/// Interpolate the attribute sets of a bracket pair at `now`.
///
/// Progress is the clamped fraction of `now` through
/// `[before.before, after.after]`; a zero-width window reads as progress 0.
/// An inverted window is a fatal [`LuxError::Window`].
pub fn interpolate(before: &Anchor, after: &Anchor, now: DateTime<Utc>) -> LuxResult<Levels> {
    if before.before > after.after {
        return Err(LuxError::window(format!(
            "window start {} is after window end {}",
            before.before, after.after
        )));
    }
    let span_ms = (after.after - before.before).num_milliseconds();
    let progress = if span_ms == 0 {
        0.0
    } else {
        let elapsed_ms = (now - before.before).num_milliseconds();
        (elapsed_ms as f64 / span_ms as f64).clamp(0.0, 1.0)
    };
    Ok(Levels::interpolate(&before.levels, &after.levels, progress))
}

/// One pure tick: refresh the window if "now" has left it, interpolate, and
/// decide whether to emit.
///
/// Returns the updated context and the output, if any. Reasons for emitting
/// nothing: the channel is disabled, the interpolated set is unchanged on a
/// recurring tick, or a (normally impossible) refresh failure, which is
/// logged and leaves the stale window in place for the next tick.
#[tracing::instrument(skip(ctx, source), fields(topic = %ctx.topic))]
pub fn evaluate(
    mut ctx: EvaluationContext,
    source: &dyn InstantSource,
    system_now: DateTime<Utc>,
    kind: TickKind,
    step: Duration,
) -> (EvaluationContext, Option<EvalOutput>) {
    let now = system_now + ctx.now_offset;

    let stale = ctx
        .anchors
        .get(ctx.closest_before)
        .zip(ctx.anchors.get(ctx.closest_after))
        .is_none_or(|(b, a)| now < b.before || now > a.after);
    if stale && !refresh_window(&mut ctx, source, now) {
        return (ctx, None);
    }

    if !ctx.enabled {
        return (ctx, None);
    }

    let data = match interpolate(&ctx.anchors[ctx.closest_before], &ctx.anchors[ctx.closest_after], now) {
        Ok(d) => d,
        Err(err) => {
            tracing::warn!(error = %err, "skipping tick");
            return (ctx, None);
        }
    };

    let changed = !ctx.last_data.as_ref().is_some_and(|last| last.same_levels(&data));
    let (emit, transition_secs) = match kind {
        TickKind::Initial => (true, None),
        TickKind::Recurring => (changed, Some(step.num_milliseconds() as f64 / 1000.0)),
    };
    if !emit {
        return (ctx, None);
    }

    ctx.last_data = Some(data.clone());
    (ctx, Some(EvalOutput { data, transition_secs }))
}

/// Re-query the instant source and re-validate the retained fade list
/// around the new "now". True on success.
fn refresh_window(ctx: &mut EvaluationContext, source: &dyn InstantSource, now: DateTime<Utc>) -> bool {
    let instants = source.named_instants(now.date_naive(), ctx.location);
    let mut diag = Diagnostics::new();
    // The list already validated once, so failures here are unexpected.
    match validate_fades(&ctx.raw_record, &instants, now, &mut diag) {
        Ok(anchors) => match select_brackets(&anchors) {
            Some((before, after)) => {
                ctx.anchors = anchors;
                ctx.closest_before = before;
                ctx.closest_after = after;
                true
            }
            None => false,
        },
        Err(err) => {
            tracing::error!(error = %err, topic = %ctx.topic, "background window refresh failed");
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/evaluate.rs"]
mod tests;

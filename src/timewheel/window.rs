//! Day-wrap normalization of recurring daily anchors.

use chrono::{DateTime, Duration, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Shift a resolved anchor instant by whole days so it brackets `now`.
///
/// `unshifted` is the anchor resolved on `now`'s calendar date with its
/// minute offset already applied. The returned pair is the nearest daily
/// occurrence at or before the conceptual anchor and the next one after it:
/// `before <= now <= after` holds for any input, however far `unshifted`
/// nominally sits from `now`.
///
/// When `unshifted == now` both halves collapse onto the same instant; the
/// interpolation step must treat that zero-width window as progress 0.
pub fn resolve_window(unshifted: DateTime<Utc>, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let diff_days = (unshifted - now).num_milliseconds() as f64 / MS_PER_DAY;
    let before = unshifted - Duration::days(diff_days.ceil() as i64);
    let after = unshifted - Duration::days(diff_days.floor() as i64);
    (before, after)
}

#[cfg(test)]
#[path = "../../tests/unit/timewheel/window.rs"]
mod tests;

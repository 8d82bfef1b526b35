use chrono::{DateTime, TimeZone, Utc};

use crate::astro::source::NamedInstants;

/// A raw anchor time: either a key into the named-instant table or a fixed
/// 24-hour wall-clock time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AnchorTime {
    /// A named instant such as a solar event (`"sunrise"`).
    Named(String),
    /// A fixed `HH:MM` clock time, resolved on the calendar date of "now".
    Clock {
        /// Hour, `0..=23`.
        hour: u32,
        /// Minute, `0..=59`.
        minute: u32,
    },
}

impl AnchorTime {
    /// Parse a raw time string against a named-instant table.
    ///
    /// Returns `None` when the string is neither a key in `instants` nor a
    /// valid `HH:MM` time (one- or two-digit hour, two-digit minute).
    pub fn parse(raw: &str, instants: &NamedInstants) -> Option<AnchorTime> {
        if instants.contains_key(raw) {
            return Some(AnchorTime::Named(raw.to_string()));
        }
        let (hour, minute) = parse_clock(raw)?;
        Some(AnchorTime::Clock { hour, minute })
    }

    /// Resolve to the unshifted instant on the calendar date of `now`.
    ///
    /// Named anchors read straight from the instant table (which is built for
    /// that date); clock anchors land at `HH:MM:00.000` UTC on `now`'s date.
    pub fn resolve(&self, instants: &NamedInstants, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            AnchorTime::Named(key) => instants.get(key).copied(),
            AnchorTime::Clock { hour, minute } => now
                .date_naive()
                .and_hms_opt(*hour, *minute, 0)
                .map(|naive| Utc.from_utc_datetime(&naive)),
        }
    }
}

/// Parse `HH:MM` with a one- or two-digit hour and exactly two minute
/// digits. Equivalent to `^(2[0-3]|[01]?[0-9]):([0-5][0-9])$`.
fn parse_clock(raw: &str) -> Option<(u32, u32)> {
    let (h, m) = raw.split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

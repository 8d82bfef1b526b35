use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::validate::location::Location;

/// Named time-of-day labels mapped to absolute instants, for one calendar
/// date. Keys are opaque to the engine.
pub type NamedInstants = BTreeMap<String, DateTime<Utc>>;

/// Provider of named instants for a given date and location.
///
/// Implementations must be idempotent per `(date, location)`; the engine
/// re-queries whenever the active fade window expires (typically once the
/// clock crosses into the next anchor pair).
pub trait InstantSource {
    /// Named instants for `date` at `location`, as UTC.
    fn named_instants(&self, date: NaiveDate, location: Location) -> NamedInstants;
}

/// A map-backed instant source for tests and offline evaluation.
///
/// Returns the same table regardless of date or location.
#[derive(Clone, Debug, Default)]
pub struct FixedInstants {
    instants: NamedInstants,
}

impl FixedInstants {
    /// Build from an explicit table.
    pub fn new(instants: NamedInstants) -> Self {
        Self { instants }
    }
}

impl InstantSource for FixedInstants {
    fn named_instants(&self, _date: NaiveDate, _location: Location) -> NamedInstants {
        self.instants.clone()
    }
}

pub mod attrs;
pub(crate) mod coerce;

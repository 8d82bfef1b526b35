//! Luxfade is an astronomically anchored lighting fade engine.
//!
//! It consumes untrusted records describing lighting attribute targets
//! (brightness, color temperature, RGB/HS/XY color) anchored to named solar
//! events or `HH:MM` clock times, and turns them into a smoothly
//! interpolated attribute set re-emitted on a periodic tick.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: `record -> (Location, now offset, Vec<Anchor>)`, with
//!    lenient per-field validation; bad fields are dropped with warnings,
//!    not fatal.
//! 2. **Resolve**: each anchor's daily recurrence is day-wrap normalized so
//!    its `before`/`after` occurrences bracket "now".
//! 3. **Select**: the bracket pair (latest `before`, earliest `after`)
//!    defines the active window.
//! 4. **Interpolate**: proportional progress through the window blends every
//!    attribute present in both anchors, clamped to its domain.
//! 5. **Schedule**: one repeating task per channel re-evaluates on a fixed
//!    period and suppresses unchanged output.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure core**: validation and interpolation are pure functions; the
//!   scheduler applies returned context updates, never the other way around.
//! - **Partial-failure recovery**: one bad attribute never sinks an anchor,
//!   and one bad anchor never sinks an evaluation (two valid anchors
//!   suffice).
//! - **Injected astronomy**: named instants come from an [`InstantSource`];
//!   the built-in [`SolarInstants`] is one implementation, not a dependency
//!   of the core.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod astro;
mod engine;
mod foundation;
mod levels;
mod timewheel;
mod validate;

pub use astro::solar::SolarInstants;
pub use astro::source::{FixedInstants, InstantSource, NamedInstants};
pub use engine::context::{ChannelRegistry, EvaluationContext};
pub use engine::dispatch::{Disposition, Engine};
pub use engine::evaluate::{DEFAULT_STEP_MS, TickKind, evaluate, interpolate, select_brackets, setup};
pub use engine::output::EvalOutput;
pub use engine::scheduler::{OutputSink, Scheduler};
pub use foundation::diag::{Diagnostics, Severity};
pub use foundation::error::{LuxError, LuxResult};
pub use levels::attrs::{
    Levels, MAX_BRIGHTNESS, MAX_BRIGHTNESS_PCT, MAX_HUE, MAX_KELVIN, MAX_MIREDS, MAX_RGB, MAX_SAT,
    MAX_XY, MIN_KELVIN, MIN_MIREDS,
};
pub use timewheel::clock::AnchorTime;
pub use timewheel::window::resolve_window;
pub use validate::activation::{Activation, DEFAULT_TOPIC, parse_activation};
pub use validate::fades::{Anchor, MAX_OFFSET_MINS, MIN_OFFSET_MINS, validate_fades};
pub use validate::location::{
    Location, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE, parse_location,
};
pub use validate::now_override::parse_now_offset;

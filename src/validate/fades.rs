//! Fade-list validation.
//!
//! Raw fade entries are validated independently and leniently: a bad
//! attribute field drops only that field, a bad offset is forced to zero,
//! and only an unresolvable time (or an entry left with no attributes at
//! all) drops the whole entry. Each recovery emits one warning. The list as
//! a whole is fatal only when it is missing, not an array, or leaves fewer
//! than two valid anchors to interpolate between.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::astro::source::NamedInstants;
use crate::foundation::diag::Diagnostics;
use crate::foundation::error::{LuxError, LuxResult};
use crate::levels::attrs::{
    Levels, MAX_BRIGHTNESS, MAX_BRIGHTNESS_PCT, MAX_HUE, MAX_KELVIN, MAX_MIREDS, MAX_RGB, MAX_SAT,
    MAX_XY, MIN_KELVIN, MIN_MIREDS,
};
use crate::levels::coerce::{as_float, as_int};
use crate::timewheel::clock::AnchorTime;
use crate::timewheel::window::resolve_window;

/// Minimum per-anchor offset in minutes.
pub const MIN_OFFSET_MINS: i64 = -720;
/// Maximum per-anchor offset in minutes.
pub const MAX_OFFSET_MINS: i64 = 720;

/// A validated fade anchor: a resolvable time, an offset, at least one
/// attribute target, and the day-wrap-normalized window edges.
///
/// Invariant: `before <= after`, and both bracket the "now" the anchor was
/// validated against.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Anchor {
    /// The raw anchor time this was resolved from.
    pub time: AnchorTime,
    /// Minute offset applied to the anchor time.
    pub offset_mins: i64,
    /// Surviving attribute targets (never empty).
    pub levels: Levels,
    /// Most recent past occurrence of the anchor.
    pub before: DateTime<Utc>,
    /// Next future occurrence of the anchor.
    pub after: DateTime<Utc>,
}

/// Validate the `fades` array of an input record against a named-instant
/// table and a reference "now".
///
/// Surviving anchors keep their insertion order. Bracket selection is the
/// caller's job, not the validator's.
#[tracing::instrument(skip_all, fields(now = %now))]
pub fn validate_fades(
    record: &Value,
    instants: &NamedInstants,
    now: DateTime<Utc>,
    diag: &mut Diagnostics,
) -> LuxResult<Vec<Anchor>> {
    let raw = match record.get("fades") {
        None | Some(Value::Null) => {
            diag.fail("fades error!");
            return Err(LuxError::fades("fades not defined in record"));
        }
        Some(v) => v,
    };
    let Some(list) = raw.as_array() else {
        diag.fail("fades error!");
        return Err(LuxError::fades("fades is not an array"));
    };

    let mut anchors = Vec::with_capacity(list.len());
    for (index, fade) in list.iter().enumerate() {
        if let Some(anchor) = validate_entry(index, fade, instants, now, diag) {
            anchors.push(anchor);
        }
    }

    // A fade needs two anchors to interpolate between.
    if anchors.len() < 2 {
        diag.fail("fades length error!");
        return Err(LuxError::fades(format!(
            "fades had fewer than 2 valid entries ({} survived validation)",
            anchors.len()
        )));
    }
    Ok(anchors)
}

fn validate_entry(
    index: usize,
    fade: &Value,
    instants: &NamedInstants,
    now: DateTime<Utc>,
    diag: &mut Diagnostics,
) -> Option<Anchor> {
    let entry_status = format!("fades[{index}] is invalid!");

    let time_raw = match fade.get("time") {
        None | Some(Value::Null) => {
            diag.warn(format!("time not defined in fades[{index}]"), entry_status);
            return None;
        }
        Some(v) => v,
    };
    let time = match time_raw.as_str().and_then(|s| AnchorTime::parse(s, instants)) {
        Some(t) => t,
        None => {
            let allowed: Vec<&str> = instants.keys().map(String::as_str).collect();
            diag.warn(
                format!(
                    "invalid time {time_raw} provided within fades[{index}]; must be either {} or in the form hh:mm",
                    allowed.join(", ")
                ),
                entry_status,
            );
            return None;
        }
    };

    let offset_mins = match fade.get("offset_mins") {
        None => 0,
        Some(v) => match as_int(v) {
            Some(o) if (MIN_OFFSET_MINS..=MAX_OFFSET_MINS).contains(&o) => o,
            Some(_) => {
                diag.warn(
                    format!(
                        "invalid fades[{index}].offset_mins {v}; must be within the range {MIN_OFFSET_MINS} to {MAX_OFFSET_MINS}"
                    ),
                    format!("fades[{index}].offset_mins is invalid!"),
                );
                0
            }
            None => {
                diag.warn(
                    format!("invalid fades[{index}].offset_mins {v}; must be an integer"),
                    format!("fades[{index}].offset_mins is invalid!"),
                );
                0
            }
        },
    };

    let levels = validate_levels(index, fade, diag);
    if levels.is_empty() {
        diag.warn(
            format!("no levels provided within fades[{index}]; skipping"),
            format!("fades[{index}] is invalid!"),
        );
        return None;
    }

    let Some(unshifted) = time.resolve(instants, now) else {
        diag.warn(
            format!("time in fades[{index}] could not be resolved"),
            format!("fades[{index}] is invalid!"),
        );
        return None;
    };
    let shifted = unshifted + Duration::minutes(offset_mins);
    let (before, after) = resolve_window(shifted, now);

    Some(Anchor { time, offset_mins, levels, before, after })
}

fn validate_levels(index: usize, fade: &Value, diag: &mut Diagnostics) -> Levels {
    Levels {
        brightness: int_field(index, fade, "brightness", 0, MAX_BRIGHTNESS, diag),
        brightness_pct: int_field(index, fade, "brightness_pct", 0, MAX_BRIGHTNESS_PCT, diag),
        color_temp: int_field(index, fade, "color_temp", MIN_MIREDS, MAX_MIREDS, diag),
        kelvin: int_field(index, fade, "kelvin", MIN_KELVIN, MAX_KELVIN, diag),
        rgb_color: int_array_field(index, fade, "rgb_color", diag),
        rgbw_color: int_array_field(index, fade, "rgbw_color", diag),
        rgbww_color: int_array_field(index, fade, "rgbww_color", diag),
        hs_color: float_pair_field(
            index,
            fade,
            "hs_color",
            [MAX_HUE, MAX_SAT],
            "first element between 0 and 360 and second element between 0 and 100",
            diag,
        ),
        xy_color: float_pair_field(
            index,
            fade,
            "xy_color",
            [MAX_XY, MAX_XY],
            "both between 0 and 1",
            diag,
        ),
    }
}

/// Validate one integer scalar attribute. Absent is fine; anything present
/// but unparseable or out of range drops the field with one warning.
fn int_field(
    index: usize,
    fade: &Value,
    key: &str,
    min: i64,
    max: i64,
    diag: &mut Diagnostics,
) -> Option<i64> {
    let v = fade.get(key)?;
    let status = format!("fades[{index}].{key} is invalid!");
    match as_int(v) {
        Some(n) if (min..=max).contains(&n) => Some(n),
        Some(_) => {
            diag.warn(
                format!("invalid fades[{index}].{key} {v}; must be between {min} and {max}"),
                status,
            );
            None
        }
        None => {
            diag.warn(
                format!("invalid fades[{index}].{key} {v}; must be an integer"),
                status,
            );
            None
        }
    }
}

/// Validate one fixed-length integer color vector. Wrong arity, a
/// non-integer element, or an out-of-range channel drops the whole field
/// with one warning.
fn int_array_field<const N: usize>(
    index: usize,
    fade: &Value,
    key: &str,
    diag: &mut Diagnostics,
) -> Option<[i64; N]> {
    let v = fade.get(key)?;
    let status = format!("fades[{index}].{key} is invalid!");

    let Some(arr) = v.as_array().filter(|a| a.len() == N) else {
        diag.warn(
            format!("invalid fades[{index}].{key} {v}; must be an array of exactly {N} numbers"),
            status,
        );
        return None;
    };

    let mut out = [0i64; N];
    for (i, item) in arr.iter().enumerate() {
        match as_int(item) {
            Some(n) if (0..=MAX_RGB).contains(&n) => out[i] = n,
            _ => {
                diag.warn(
                    format!(
                        "invalid values in fades[{index}].{key} {v}; must be {N}x integers between 0 and {MAX_RGB}"
                    ),
                    status,
                );
                return None;
            }
        }
    }
    Some(out)
}

/// Validate one two-element float vector (`hs_color`, `xy_color`). Each
/// element has its own upper bound; lower bound is zero.
fn float_pair_field(
    index: usize,
    fade: &Value,
    key: &str,
    max: [f64; 2],
    bounds_desc: &str,
    diag: &mut Diagnostics,
) -> Option<[f64; 2]> {
    let v = fade.get(key)?;
    let status = format!("fades[{index}].{key} is invalid!");

    let Some(arr) = v.as_array().filter(|a| a.len() == 2) else {
        diag.warn(
            format!("invalid fades[{index}].{key} {v}; must be an array of exactly 2 numbers"),
            status,
        );
        return None;
    };

    let mut out = [0.0f64; 2];
    for (i, item) in arr.iter().enumerate() {
        match as_float(item) {
            Some(f) if (0.0..=max[i]).contains(&f) => out[i] = f,
            _ => {
                diag.warn(
                    format!(
                        "invalid values in fades[{index}].{key} {v}; must be 2x numbers, {bounds_desc}"
                    ),
                    status,
                );
                return None;
            }
        }
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/validate/fades.rs"]
mod tests;

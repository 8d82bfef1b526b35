use serde_json::Value;

use crate::foundation::diag::Diagnostics;
use crate::foundation::error::{LuxError, LuxResult};
use crate::levels::coerce::as_float;

/// Minimum latitude in degrees.
pub const MIN_LATITUDE: f64 = -90.0;
/// Maximum latitude in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Minimum longitude in degrees.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Maximum longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// A validated geographic location. Immutable once validated; required on
/// every evaluation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    /// Latitude in degrees, `-90..=90`.
    pub latitude: f64,
    /// Longitude in degrees, `-180..=180`.
    pub longitude: f64,
}

/// Pull and validate `location.{latitude,longitude}` from an input record.
///
/// Validation stops at the first failing field, so exactly one fatal error
/// is reported: missing field, not a number, or out of range.
pub fn parse_location(record: &Value, diag: &mut Diagnostics) -> LuxResult<Location> {
    let status = "location error!";

    let loc = record.get("location");
    let (lat_raw, lon_raw) = match loc {
        Some(l) => (l.get("latitude"), l.get("longitude")),
        None => (None, None),
    };
    let (Some(lat_raw), Some(lon_raw)) = (lat_raw, lon_raw) else {
        diag.fail(status);
        return Err(LuxError::location(
            "location.latitude and/or location.longitude not defined",
        ));
    };

    let Some(latitude) = as_float(lat_raw) else {
        diag.fail(status);
        return Err(LuxError::location(format!(
            "location.latitude {lat_raw} is not a number"
        )));
    };
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        diag.fail(status);
        return Err(LuxError::location(format!(
            "location.latitude {lat_raw} is not between {MIN_LATITUDE} and {MAX_LATITUDE} degrees"
        )));
    }

    let Some(longitude) = as_float(lon_raw) else {
        diag.fail(status);
        return Err(LuxError::location(format!(
            "location.longitude {lon_raw} is not a number"
        )));
    };
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        diag.fail(status);
        return Err(LuxError::location(format!(
            "location.longitude {lon_raw} is not between {MIN_LONGITUDE} and {MAX_LONGITUDE} degrees"
        )));
    }

    Ok(Location { latitude, longitude })
}

//! Built-in solar instant source.
//!
//! Closed-form NOAA-style solar geometry: equation of time and declination
//! from the day of year, then hour angles for the horizon crossing and civil
//! twilight. Accuracy is a couple of minutes, which is plenty for fade
//! anchors.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::astro::source::{InstantSource, NamedInstants};
use crate::validate::location::Location;

const EARTH_AXIAL_TILT: f64 = 23.45;
/// Sun altitude at the civil twilight boundary, degrees.
const CIVIL_TWILIGHT_DEG: f64 = -6.0;

/// Solar instant source producing `dawn`, `sunrise`, `solar_noon`, `sunset`,
/// `dusk` and `nadir` for a date and location.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolarInstants;

impl InstantSource for SolarInstants {
    fn named_instants(&self, date: NaiveDate, location: Location) -> NamedInstants {
        let n = date.ordinal() as i32;
        let eot = equation_of_time(n);
        let decl = solar_declination(n);

        // Solar noon in minutes after UTC midnight: clock noon corrected for
        // longitude (4 min/degree) and the equation of time.
        let noon_min = 720.0 - 4.0 * location.longitude - eot;

        let day_half = half_day_minutes(location.latitude, decl, 0.0);
        let twilight_half = half_day_minutes(location.latitude, decl, CIVIL_TWILIGHT_DEG);

        let midnight = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default());
        let at = |minutes: f64| midnight + Duration::milliseconds((minutes * 60_000.0) as i64);

        let mut out = NamedInstants::new();
        out.insert("dawn".to_string(), at(noon_min - twilight_half));
        out.insert("sunrise".to_string(), at(noon_min - day_half));
        out.insert("solar_noon".to_string(), at(noon_min));
        out.insert("sunset".to_string(), at(noon_min + day_half));
        out.insert("dusk".to_string(), at(noon_min + twilight_half));
        out.insert("nadir".to_string(), at(noon_min - 720.0));
        out
    }
}

fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

/// Equation of time in minutes for day-of-year `n`.
fn equation_of_time(n: i32) -> f64 {
    let b = deg_to_rad((n - 1) as f64 * (360.0 / 365.0));
    229.18
        * (0.000075
            + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

/// Solar declination in degrees for day-of-year `n`.
fn solar_declination(n: i32) -> f64 {
    EARTH_AXIAL_TILT * deg_to_rad(360.0 * ((284 + n) as f64 / 365.0)).sin()
}

/// Minutes between solar noon and the moment the sun reaches `altitude_deg`,
/// clamped for polar day (720) and polar night (0).
fn half_day_minutes(latitude: f64, declination: f64, altitude_deg: f64) -> f64 {
    let lat_rad = deg_to_rad(latitude);
    let decl_rad = deg_to_rad(declination);
    let cos_h = (deg_to_rad(altitude_deg).sin() - lat_rad.sin() * decl_rad.sin())
        / (lat_rad.cos() * decl_rad.cos());

    if cos_h >= 1.0 {
        // Sun never reaches the altitude: collapse onto solar noon.
        0.0
    } else if cos_h <= -1.0 {
        // Sun never drops below the altitude: the whole day qualifies.
        720.0
    } else {
        let h_deg = rad_to_deg(cos_h.acos());
        (h_deg / 15.0) * 60.0
    }
}

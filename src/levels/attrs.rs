//! The nine lighting attribute domains and their interpolation rules.

/// Maximum `brightness` channel value.
pub const MAX_BRIGHTNESS: i64 = 255;
/// Maximum `brightness_pct` value.
pub const MAX_BRIGHTNESS_PCT: i64 = 100;
/// Minimum `color_temp` in mireds.
pub const MIN_MIREDS: i64 = 150;
/// Maximum `color_temp` in mireds.
pub const MAX_MIREDS: i64 = 500;
/// Minimum `kelvin` color temperature.
pub const MIN_KELVIN: i64 = 2000;
/// Maximum `kelvin` color temperature.
pub const MAX_KELVIN: i64 = 6500;
/// Maximum value of any RGB/RGBW/RGBWW channel.
pub const MAX_RGB: i64 = 255;
/// Maximum hue in degrees (`hs_color[0]`).
pub const MAX_HUE: f64 = 360.0;
/// Maximum saturation percent (`hs_color[1]`).
pub const MAX_SAT: f64 = 100.0;
/// Maximum CIE xy chromaticity coordinate (`xy_color`).
pub const MAX_XY: f64 = 1.0;

/// A set of optional lighting attribute targets.
///
/// Each attribute is validated independently; an unset attribute simply does
/// not participate in a fade. Integer-typed attributes hold values already
/// truncated toward zero by validation; `hs_color` and `xy_color` keep float
/// precision.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Levels {
    /// Brightness, `0..=255`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,
    /// Brightness percentage, `0..=100`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness_pct: Option<i64>,
    /// Color temperature in mireds, `150..=500`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<i64>,
    /// Color temperature in kelvin, `2000..=6500`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kelvin: Option<i64>,
    /// RGB color, three channels `0..=255`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb_color: Option<[i64; 3]>,
    /// RGBW color, four channels `0..=255`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgbw_color: Option<[i64; 4]>,
    /// RGBWW color, five channels `0..=255`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgbww_color: Option<[i64; 5]>,
    /// Hue/saturation color, hue `0..=360`, saturation `0..=100`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hs_color: Option<[f64; 2]>,
    /// CIE xy chromaticity, both coordinates `0..=1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xy_color: Option<[f64; 2]>,
}

impl Levels {
    /// True when no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.brightness.is_none()
            && self.brightness_pct.is_none()
            && self.color_temp.is_none()
            && self.kelvin.is_none()
            && self.rgb_color.is_none()
            && self.rgbw_color.is_none()
            && self.rgbww_color.is_none()
            && self.hs_color.is_none()
            && self.xy_color.is_none()
    }

    /// Linearly interpolate between two attribute sets.
    ///
    /// Only attributes present on *both* sides appear in the result; there is
    /// no partial blending against a missing endpoint. Integer attributes
    /// round to nearest and clamp to their domain, float attributes clamp
    /// only. `progress` is expected to already lie in `[0, 1]`.
    pub fn interpolate(before: &Levels, after: &Levels, progress: f64) -> Levels {
        Levels {
            brightness: lerp_int(before.brightness, after.brightness, progress, 0, MAX_BRIGHTNESS),
            brightness_pct: lerp_int(
                before.brightness_pct,
                after.brightness_pct,
                progress,
                0,
                MAX_BRIGHTNESS_PCT,
            ),
            color_temp: lerp_int(
                before.color_temp,
                after.color_temp,
                progress,
                MIN_MIREDS,
                MAX_MIREDS,
            ),
            kelvin: lerp_int(before.kelvin, after.kelvin, progress, MIN_KELVIN, MAX_KELVIN),
            rgb_color: lerp_int_array(before.rgb_color, after.rgb_color, progress),
            rgbw_color: lerp_int_array(before.rgbw_color, after.rgbw_color, progress),
            rgbww_color: lerp_int_array(before.rgbww_color, after.rgbww_color, progress),
            hs_color: match (before.hs_color, after.hs_color) {
                (Some(a), Some(b)) => Some([
                    lerp_float_one(a[0], b[0], progress, 0.0, MAX_HUE),
                    lerp_float_one(a[1], b[1], progress, 0.0, MAX_SAT),
                ]),
                _ => None,
            },
            xy_color: match (before.xy_color, after.xy_color) {
                (Some(a), Some(b)) => Some([
                    lerp_float_one(a[0], b[0], progress, 0.0, MAX_XY),
                    lerp_float_one(a[1], b[1], progress, 0.0, MAX_XY),
                ]),
                _ => None,
            },
        }
    }

    /// Per-attribute equality used for change suppression.
    ///
    /// Scalars compare by equality and vectors element-wise, including
    /// attribute presence. Two sets are "the same fade step" exactly when
    /// re-emitting would repeat the previous output.
    pub fn same_levels(&self, other: &Levels) -> bool {
        self == other
    }
}

fn lerp_int_one(a: i64, b: i64, t: f64, min: i64, max: i64) -> i64 {
    let v = (t * (b - a) as f64 + a as f64).round() as i64;
    v.clamp(min, max)
}

fn lerp_int(a: Option<i64>, b: Option<i64>, t: f64, min: i64, max: i64) -> Option<i64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(lerp_int_one(a, b, t, min, max)),
        _ => None,
    }
}

fn lerp_int_array<const N: usize>(
    a: Option<[i64; N]>,
    b: Option<[i64; N]>,
    t: f64,
) -> Option<[i64; N]> {
    match (a, b) {
        (Some(a), Some(b)) => {
            let mut out = [0i64; N];
            for i in 0..N {
                out[i] = lerp_int_one(a[i], b[i], t, 0, MAX_RGB);
            }
            Some(out)
        }
        _ => None,
    }
}

fn lerp_float_one(a: f64, b: f64, t: f64, min: f64, max: f64) -> f64 {
    (t * (b - a) + a).clamp(min, max)
}

#[cfg(test)]
#[path = "../../tests/unit/levels/attrs.rs"]
mod tests;

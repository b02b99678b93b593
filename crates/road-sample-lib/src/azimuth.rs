//! Bearing and midpoint computation for a pair of WGS84 coordinates
//!
//! The bearing uses a planar approximation: the longitude delta is treated as the east
//! component and the latitude delta as the north component, with no latitude-dependent
//! scaling of longitude. It diverges from the true great-circle initial bearing at high
//! latitudes and over long segments. Output is kept bit-compatible with existing survey
//! data, so the formula must not be replaced with a geodesic bearing.
//!
//! Bearings and midpoints are rounded differently. Bearings are scaled by 10^3 and rounded half to
//! even on the scaled value. Midpoints are rounded from their exact binary value to the
//! nearest 6-decimal number, so a stored `0.1234565` (really `0.12345649999...`) rounds
//! down even though scaling it would land on a tie.

use crate::{Result, SampleError, Sample};
use geo::Coord;

/// Decimal places kept for bearings
pub const BEARING_DECIMALS: i32 = 3;

/// Decimal places kept for midpoint longitude and latitude
pub const MIDPOINT_DECIMALS: usize = 6;

/// Scale by 10^`decimals`, round half to even, scale back
#[inline(always)]
pub fn round_scaled(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Nearest `decimals`-place decimal to the exact value of `value`, ties to even
///
/// Goes through the exact decimal expansion used by float formatting, so no error is
/// introduced by scaling.
pub fn round_exact(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Planar compass bearing in degrees from `from` to `to`, rounded and normalized to [0, 360)
///
/// # Arguments
/// * `from` - Segment start (x = longitude, y = latitude)
/// * `to` - Segment end (x = longitude, y = latitude)
#[inline(always)]
pub fn planar_bearing(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let degrees = (to.x - from.x).atan2(to.y - from.y).to_degrees().rem_euclid(360.0);
    let bearing = round_scaled(degrees, BEARING_DECIMALS);

    // Values just below 360 can round up to it, and -0.0 survives rem_euclid
    if bearing >= 360.0 { 0.0 } else { bearing + 0.0 }
}

/// Arithmetic midpoint of two coordinates, rounded to six decimal places
#[inline(always)]
pub fn midpoint(from: Coord<f64>, to: Coord<f64>) -> Coord<f64> {
    Coord {
        x: round_exact((from.x + to.x) / 2.0, MIDPOINT_DECIMALS),
        y: round_exact((from.y + to.y) / 2.0, MIDPOINT_DECIMALS),
    }
}

/// Compute the sample (bearing + midpoint) for a single segment
///
/// # Returns
/// The sample, or [`SampleError::MalformedCoordinate`] if any ordinate is NaN or infinite.
/// Callers are expected to skip such pairs rather than abort.
pub fn segment_sample(from: Coord<f64>, to: Coord<f64>) -> Result<Sample> {
    let finite = from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite();
    if !finite {
        return Err(SampleError::MalformedCoordinate {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
        });
    }

    Ok(Sample::new(planar_bearing(from, to), midpoint(from, to)))
}

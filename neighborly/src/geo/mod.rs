//! Great-circle distance math
//!
//! Provides the haversine distance between two geographic points on a
//! spherical Earth. Every proximity decision in the neighborhood filter is
//! made with [`distance`].

mod types;

pub use types::{GeoPoint, GeoTagged, MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};

use std::cmp::Ordering;

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_METERS`].
///
/// # Properties
///
/// - Symmetric: `distance(a, b) == distance(b, a)` bit for bit
/// - `distance(a, a) == 0.0`
/// - Never negative, never NaN for valid inputs (antipodal points included)
///
/// Inputs must be valid WGS84 coordinates (see [`GeoPoint::is_valid`]);
/// NaN or out-of-range input gives an unspecified result.
#[inline]
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    // Evaluate on a canonical ordering so swapping the arguments cannot
    // change the floating point result.
    let (p, q) = match canonical_order(&a, &b) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };

    let lat1 = p.lat.to_radians();
    let lat2 = q.lat.to_radians();
    let d_lat = (q.lat - p.lat).to_radians();
    let d_lng = (q.lng - p.lng).to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lng = (d_lng / 2.0).sin();
    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;

    // Rounding can push h slightly outside [0, 1] near the antipode.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

fn canonical_order(a: &GeoPoint, b: &GeoPoint) -> Ordering {
    a.lat.total_cmp(&b.lat).then(a.lng.total_cmp(&b.lng))
}

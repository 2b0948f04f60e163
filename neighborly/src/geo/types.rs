//! Geographic value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LNG: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LNG: f64 = 180.0;

/// A WGS84 position in decimal degrees.
///
/// Serializes as `{"lat": .., "lng": ..}`, the shape used by the report API
/// and the mapping SDK.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90).
    pub lat: f64,
    /// Longitude in degrees (-180 to 180).
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point. No validation is performed; see [`GeoPoint::is_valid`].
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both coordinates are finite and within WGS84 bounds.
    ///
    /// Distance functions assume valid points. Callers taking coordinates
    /// from untrusted input should check this first.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.lat)
            && (MIN_LNG..=MAX_LNG).contains(&self.lng)
    }

    /// Great-circle distance to another point, in meters.
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        super::distance(*self, *other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Anything that carries a position.
///
/// The neighborhood filter only ever looks at this one field; the rest of
/// the item is opaque to it.
pub trait GeoTagged {
    /// The item's position.
    fn location(&self) -> GeoPoint;
}

impl GeoTagged for GeoPoint {
    fn location(&self) -> GeoPoint {
        *self
    }
}

impl<T: GeoTagged + ?Sized> GeoTagged for &T {
    fn location(&self) -> GeoPoint {
        (**self).location()
    }
}

impl<T: GeoTagged + ?Sized> GeoTagged for Box<T> {
    fn location(&self) -> GeoPoint {
        (**self).location()
    }
}

impl<T: GeoTagged + ?Sized> GeoTagged for std::sync::Arc<T> {
    fn location(&self) -> GeoPoint {
        (**self).location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        assert!(GeoPoint::new(37.5665, 126.9780).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
    }

    #[test]
    fn test_invalid_points() {
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.1).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_serde_shape() {
        let point = GeoPoint::new(37.5, 127.0);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"lat":37.5,"lng":127.0}"#);

        let parsed: GeoPoint = serde_json::from_str(r#"{"lat": 1.25, "lng": -2.5}"#).unwrap();
        assert_eq!(parsed, GeoPoint::new(1.25, -2.5));
    }

    #[test]
    fn test_geo_tagged_through_references() {
        let point = GeoPoint::new(10.0, 20.0);
        let boxed: Box<GeoPoint> = Box::new(point);
        assert_eq!((&point).location(), point);
        assert_eq!(boxed.location(), point);
    }

    #[test]
    fn test_display() {
        let point = GeoPoint::new(37.5665, 126.978);
        assert_eq!(point.to_string(), "(37.566500, 126.978000)");
    }
}

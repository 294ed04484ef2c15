//! Geographic coordinate types and geodesic math.
//!
//! T012: Define LatLng coordinate type
//! T013: Implement haversine distance

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used by the haversine formula.
const EARTH_RADIUS: f64 = 6_371_000.0;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl LatLng {
    /// Create a coordinate from decimal degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Cache key with both components rounded to 5 decimal places.
    ///
    /// Five decimals is roughly 1.1 m at the equator, which collapses
    /// near-duplicate classification queries onto a single key.
    pub fn cache_key(&self) -> String {
        format!("{:.5},{:.5}", self.latitude, self.longitude)
    }

    /// Format as a `lat,lng` pair for road snapping query parameters.
    pub fn query_pair(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in meters (Haversine formula).
pub fn haversine_distance(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = LatLng::new(48.8584, 2.2945);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // Eiffel Tower to Arc de Triomphe, roughly 1.7 km
        let eiffel = LatLng::new(48.8584, 2.2945);
        let arc = LatLng::new(48.8738, 2.2950);
        let d = haversine_distance(eiffel, arc);
        assert!((d - 1712.0).abs() < 20.0, "got {d}");
    }

    #[test]
    fn test_distance_symmetry() {
        let a = LatLng::new(37.7749, -122.4194);
        let b = LatLng::new(37.7750, -122.4195);
        assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
    }

    #[test]
    fn test_small_offset_is_meters() {
        // ~0.0001 degrees latitude is about 11 m
        let a = LatLng::new(52.5200, 13.4050);
        let b = LatLng::new(52.5201, 13.4050);
        let d = haversine_distance(a, b);
        assert!((d - 11.1).abs() < 0.5, "got {d}");
    }

    #[test]
    fn test_cache_key_rounding() {
        let a = LatLng::new(48.858400001, 2.294500001);
        let b = LatLng::new(48.858399999, 2.294499999);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "48.85840,2.29450");
    }

    #[test]
    fn test_cache_key_separates_distinct_points() {
        let a = LatLng::new(48.8584, 2.2945);
        let b = LatLng::new(48.8585, 2.2945);
        assert_ne!(a.cache_key(), b.cache_key());
    }
}

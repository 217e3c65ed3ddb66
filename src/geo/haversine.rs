//! Haversine great-circle distance.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate from the `longitude latitude` order used by
    /// city data files.
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(self, other)
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Interprets the pair as `(lat, lon)`.
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance between `a` and `b` in kilometers.
///
/// Exactly symmetric: the angular differences enter only through their
/// absolute values and the cosine product is commutative.
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (lat2 - lat1).abs();
    let dlon = (b.lon.to_radians() - a.lon.to_radians()).abs();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push h marginally past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let a = Coordinate::new(48.85, 2.35);
        assert!(haversine_km(&a, &a).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric() {
        let a = Coordinate::new(40.71, -74.0);
        let b = Coordinate::new(34.05, -118.24);
        assert_eq!(haversine_km(&a, &b), haversine_km(&b, &a));
    }

    #[test]
    fn test_one_degree_on_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let expected = EARTH_RADIUS_KM * 1.0f64.to_radians();
        assert!((haversine_km(&a, &b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_known_city_pair() {
        // New York -> Los Angeles is roughly 3936 km on the great circle.
        let nyc = Coordinate::new(40.7128, -74.0060);
        let la = Coordinate::new(34.0522, -118.2437);
        let d = haversine_km(&nyc, &la);
        assert!((d - 3936.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn test_antipodal() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((haversine_km(&a, &b) - half).abs() < 1e-6);
    }

    #[test]
    fn test_from_lon_lat() {
        let c = Coordinate::from_lon_lat(-73.9, 40.7);
        assert_eq!(c, Coordinate::new(40.7, -73.9));
        assert_eq!(Coordinate::from((1.0, 2.0)), Coordinate::new(1.0, 2.0));
    }
}

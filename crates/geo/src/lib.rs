//! Geospatial utilities for BookShare.
//!
//! This crate provides:
//! - Haversine distance and destination-point calculations
//! - Radius filtering over located items (parallel with the `parallel` feature)
//! - PostGIS POINT parsing (JSON and WKT formats)
//! - Radius circle polygons for map overlays
//! - Seeded synthetic placement for listings without stored coordinates
//!
//! # Example
//!
//! ```
//! use bookshare_geo::{haversine_distance, Coordinate};
//!
//! let equator = Coordinate::new(0.0, 0.0);
//! let one_degree_east = Coordinate::new(0.0, 1.0);
//!
//! let distance_km = haversine_distance(&equator, &one_degree_east);
//! assert!((distance_km - 111.19).abs() < 0.01);
//! ```

mod haversine;
mod postgis;
pub mod batch;
pub mod circle;
mod error;
pub mod synthetic;

pub use haversine::{destination_point, haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use postgis::{parse_postgis_point, PostGISPoint};
pub use batch::{calculate_distances, calculate_distances_sorted, within_radius, DistanceResult, Located, Nearby};
pub use circle::{circle_polygon, DEFAULT_CIRCLE_POINTS};
pub use synthetic::SyntheticPlacer;
pub use error::{GeoError, Result};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting values outside the WGS84 range.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate { latitude, longitude })
        }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Returns `[longitude, latitude]`, the GeoJSON position order.
    #[inline]
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(40.7128, -74.0060);
        assert_eq!(coord.latitude, 40.7128);
        assert_eq!(coord.longitude, -74.0060);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(Coordinate::checked(40.7128, -74.0060).is_ok());
        let err = Coordinate::checked(120.0, 0.0).unwrap_err();
        assert_eq!(err, GeoError::InvalidCoordinate { latitude: 120.0, longitude: 0.0 });
        assert!(err.to_string().contains("(120, 0)"));
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (40.7128, -74.0060).into();
        assert_eq!(coord.latitude, 40.7128);
    }

    #[test]
    fn test_display_uses_four_decimals() {
        let coord = Coordinate::new(40.712_776, -74.005_974);
        assert_eq!(coord.to_string(), "40.7128, -74.0060");
    }
}

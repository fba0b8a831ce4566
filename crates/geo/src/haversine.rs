//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// # Arguments
/// * `from` - Starting coordinate
/// * `to` - Ending coordinate
///
/// # Returns
/// Distance in kilometers
///
/// # Example
/// ```
/// use bookshare_geo::{haversine_distance, Coordinate};
///
/// let new_york = Coordinate::new(40.7128, -74.0060);
/// let boston = Coordinate::new(42.3601, -71.0589);
///
/// let distance = haversine_distance(&new_york, &boston);
/// assert!((distance - 306.0).abs() < 5.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1.0 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// Point reached by travelling `distance_km` from `from` along the great
/// circle with initial `bearing` (radians, clockwise from north).
///
/// The result is always a valid coordinate and lies exactly `distance_km`
/// from the start, up to floating point error, at any latitude.
///
/// # Example
/// ```
/// use bookshare_geo::{destination_point, haversine_distance, Coordinate};
///
/// let near_pole = Coordinate::new(89.9, 0.0);
/// let point = destination_point(&near_pole, 1.0, 50.0);
/// assert!((haversine_distance(&near_pole, &point) - 50.0).abs() < 1e-3);
/// ```
pub fn destination_point(from: &Coordinate, bearing: f64, distance_km: f64) -> Coordinate {
    let (lat1, lon1) = from.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Coordinate::new(lat2.to_degrees().clamp(-90.0, 90.0), wrap_longitude(lon2.to_degrees()))
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

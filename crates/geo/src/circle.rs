//! Radius circle geometry for map overlays.
//!
//! Map providers draw the search radius as a filled polygon. Each vertex is
//! the great-circle destination `radius_km` from the centre, so the ring
//! matches the haversine radius test at every latitude.

use crate::{destination_point, Coordinate};

/// Number of ring vertices used when the caller has no preference.
pub const DEFAULT_CIRCLE_POINTS: usize = 64;

/// Build a closed polygon ring approximating a circle of `radius_km` around
/// `center`.
///
/// The returned ring has `points + 1` vertices; the last repeats the first so
/// it can be used directly as a GeoJSON linear ring. `points` below 3 is
/// raised to 3.
///
/// # Example
/// ```
/// use bookshare_geo::{circle_polygon, Coordinate};
///
/// let ring = circle_polygon(&Coordinate::new(40.7128, -74.0060), 5.0, 64);
/// assert_eq!(ring.len(), 65);
/// assert_eq!(ring.first(), ring.last());
/// ```
pub fn circle_polygon(center: &Coordinate, radius_km: f64, points: usize) -> Vec<Coordinate> {
    let points = points.max(3);

    // Counter-clockwise from due east
    let mut ring: Vec<Coordinate> = (0..points)
        .map(|i| {
            let angle = (i as f64 / points as f64) * std::f64::consts::TAU;
            destination_point(center, std::f64::consts::FRAC_PI_2 - angle, radius_km)
        })
        .collect();

    ring.push(ring[0]);
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_distance;

    const CENTER: Coordinate = Coordinate { latitude: 40.7128, longitude: -74.0060 };

    #[test]
    fn test_ring_is_closed() {
        let ring = circle_polygon(&CENTER, 5.0, 64);
        assert_eq!(ring.len(), 65);
        assert_eq!(ring[0], ring[64]);
    }

    #[test]
    fn test_vertices_sit_on_radius() {
        let ring = circle_polygon(&CENTER, 10.0, 32);
        for vertex in &ring {
            let d = haversine_distance(&CENTER, vertex);
            assert!((d - 10.0).abs() < 1e-6, "vertex at {} km", d);
        }
    }

    #[test]
    fn test_ring_near_pole_keeps_radius() {
        let center = Coordinate::new(89.95, 20.0);
        let ring = circle_polygon(&center, 25.0, 64);
        for vertex in &ring {
            assert!(vertex.is_valid());
            assert!((haversine_distance(&center, vertex) - 25.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_first_vertex_points_east() {
        let ring = circle_polygon(&CENTER, 5.0, 8);
        assert!((ring[0].latitude - CENTER.latitude).abs() < 1e-3);
        assert!(ring[0].longitude > CENTER.longitude);
        // Quarter turn later the ring heads north
        assert!(ring[2].latitude > CENTER.latitude);
    }

    #[test]
    fn test_minimum_point_count() {
        let ring = circle_polygon(&CENTER, 1.0, 0);
        assert_eq!(ring.len(), 4);
    }
}

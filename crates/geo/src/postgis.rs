//! PostGIS POINT parsing utilities.
//!
//! Listing rows may carry their position in a PostGIS column. Supabase hands
//! those back as one of:
//! - GeoJSON: `{"type": "Point", "coordinates": [lng, lat]}`
//! - WKT: `POINT(lng lat)`
//! - EWKT: `SRID=4326;POINT(lng lat)`

use crate::{Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};

/// A PostGIS Point representation that can be parsed from JSON or WKT.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostGISPoint {
    /// GeoJSON format: {"type": "Point", "coordinates": [lng, lat]}
    GeoJson(GeoJsonPoint),
    /// Raw WKT or EWKT string
    Wkt(String),
}

/// GeoJSON Point format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    /// Should be "Point"
    #[serde(rename = "type")]
    pub point_type: Option<String>,
    /// [longitude, latitude] array
    pub coordinates: [f64; 2],
}

impl PostGISPoint {
    /// Convert to a validated coordinate.
    pub fn to_coordinate(&self) -> Result<Coordinate> {
        match self {
            PostGISPoint::GeoJson(geojson) => {
                let [lng, lat] = geojson.coordinates;
                Coordinate::checked(lat, lng)
            }
            PostGISPoint::Wkt(wkt) => parse_wkt_point(wkt),
        }
    }
}

/// Parse a PostGIS point from a JSON value.
///
/// Returns `None` for null, malformed or out-of-range values; a listing with
/// an unusable point is treated as having no stored position.
///
/// # Example
/// ```
/// use bookshare_geo::parse_postgis_point;
/// use serde_json::json;
///
/// let geojson = json!({"type": "Point", "coordinates": [-74.0060, 40.7128]});
/// let coord = parse_postgis_point(&geojson).unwrap();
/// assert!((coord.latitude - 40.7128).abs() < 0.0001);
///
/// let wkt = json!("SRID=4326;POINT(-74.0060 40.7128)");
/// let coord = parse_postgis_point(&wkt).unwrap();
/// assert!((coord.longitude + 74.0060).abs() < 0.0001);
/// ```
pub fn parse_postgis_point(value: &serde_json::Value) -> Option<Coordinate> {
    if value.is_null() {
        return None;
    }

    if value.is_object() {
        return serde_json::from_value::<GeoJsonPoint>(value.clone())
            .ok()
            .and_then(|point| PostGISPoint::GeoJson(point).to_coordinate().ok());
    }

    value.as_str().and_then(|wkt| parse_wkt_point(wkt).ok())
}

/// Parse a WKT `POINT(longitude latitude)`, with an optional `SRID=n;` prefix.
fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let wkt = wkt.trim();
    let wkt = match wkt.split_once(';') {
        Some((srid, rest)) if srid.trim_start().to_ascii_uppercase().starts_with("SRID=") => rest.trim(),
        _ => wkt,
    };

    let body = wkt
        .strip_prefix("POINT")
        .ok_or_else(|| GeoError::InvalidWkt(format!("Expected POINT, got: {wkt}")))?
        .trim_start();

    let inner = body
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| GeoError::InvalidWkt(format!("Unbalanced parentheses in: {wkt}")))?;

    let parts: Vec<&str> = inner.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    }

    let lng: f64 = parts[0]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {}", parts[0])))?;
    let lat: f64 = parts[1]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {}", parts[1])))?;

    Coordinate::checked(lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_geojson_point() {
        let value = json!({
            "type": "Point",
            "coordinates": [-73.9442, 40.6782]
        });

        let coord = parse_postgis_point(&value).unwrap();
        assert!((coord.latitude - 40.6782).abs() < 0.0001);
        assert!((coord.longitude - (-73.9442)).abs() < 0.0001);
    }

    #[test]
    fn test_parse_geojson_without_type() {
        let value = json!({ "coordinates": [-73.9442, 40.6782] });
        assert!(parse_postgis_point(&value).is_some());
    }

    #[test]
    fn test_parse_wkt_point() {
        let value = json!("POINT(-73.9442 40.6782)");
        let coord = parse_postgis_point(&value).unwrap();
        assert!((coord.latitude - 40.6782).abs() < 0.0001);
    }

    #[test]
    fn test_parse_wkt_with_space_and_srid() {
        assert!(parse_postgis_point(&json!("POINT (-73.9442 40.6782)")).is_some());
        assert!(parse_postgis_point(&json!("SRID=4326;POINT(-73.9442 40.6782)")).is_some());
    }

    #[test]
    fn test_parse_null_returns_none() {
        assert!(parse_postgis_point(&json!(null)).is_none());
    }

    #[test]
    fn test_swapped_axes_out_of_range_are_rejected() {
        // latitude 200 is impossible, so the point is discarded
        assert!(parse_postgis_point(&json!("POINT(40.0 200.0)")).is_none());
        assert!(parse_postgis_point(&json!({"coordinates": [10.0, -95.0]})).is_none());
    }

    #[test]
    fn test_parse_invalid_wkt() {
        assert!(parse_wkt_point("POLYGON((0 0, 1 1, 1 0, 0 0))").is_err());
        assert!(parse_wkt_point("POINT(1 2").is_err());
        assert!(parse_wkt_point("POINT(1 2 3)").is_err());
        assert!(parse_wkt_point("POINT(east north)").is_err());
    }

    #[test]
    fn test_untagged_enum_roundtrip_shape() {
        let point: PostGISPoint = serde_json::from_value(json!("POINT(1 2)")).unwrap();
        let coord = point.to_coordinate().unwrap();
        assert_eq!(coord, Coordinate::new(2.0, 1.0));
    }
}

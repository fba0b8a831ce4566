//! Mapbox GL backend.

use super::scene::{Scene, USER_COLOR};
use super::MapBackend;
use crate::error::{LocatorError, Result};
use bookshare_core::config::MapBackendKind;
use bookshare_core::session::MapCredential;
use serde_json::{json, Value};

const STYLE: &str = "mapbox://styles/mapbox/streets-v12";
const CIRCLE_SOURCE: &str = "radius-circle";

/// Mapbox GL JS map. Needs a public (`pk.`) access token.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapboxBackend;

impl MapBackend for MapboxBackend {
    fn kind(&self) -> MapBackendKind {
        MapBackendKind::Mapbox
    }

    fn requires_credential(&self) -> bool {
        true
    }

    fn validate_credential(&self, credential: &MapCredential) -> Result<()> {
        let token = credential.expose();
        if token.starts_with("sk.") {
            return Err(LocatorError::MapInitFailure(
                "secret Mapbox tokens must not be used in a map view, use a public pk. token".into(),
            ));
        }
        match token.strip_prefix("pk.") {
            Some(rest) if !rest.is_empty() && !rest.contains(char::is_whitespace) => Ok(()),
            _ => Err(LocatorError::MapInitFailure(
                "Mapbox public tokens start with 'pk.'".into(),
            )),
        }
    }

    fn render(&self, scene: &Scene) -> Value {
        let markers: Vec<Value> = scene
            .markers
            .iter()
            .map(|m| {
                json!({
                    "id": m.listing_id,
                    "lngLat": m.coordinate.to_lng_lat(),
                    "color": m.color,
                    "glyph": m.glyph,
                    "popup": m.popup,
                })
            })
            .collect();

        json!({
            "backend": self.kind().as_str(),
            "style": STYLE,
            "center": scene.center.to_lng_lat(),
            "zoom": scene.zoom,
            "controls": [{"type": "navigation", "position": "top-right"}],
            "userMarker": {
                "lngLat": scene.center.to_lng_lat(),
                "color": USER_COLOR,
                "popup": "Your Location",
            },
            "sources": {
                CIRCLE_SOURCE: {
                    "type": "geojson",
                    "data": {
                        "type": "Feature",
                        "geometry": {
                            "type": "Polygon",
                            "coordinates": [scene.circle_lng_lat()],
                        },
                        "properties": {},
                    },
                },
            },
            "layers": [
                {
                    "id": "radius-circle-fill",
                    "type": "fill",
                    "source": CIRCLE_SOURCE,
                    "paint": {"fill-color": USER_COLOR, "fill-opacity": 0.1},
                },
                {
                    "id": "radius-circle-stroke",
                    "type": "line",
                    "source": CIRCLE_SOURCE,
                    "paint": {"line-color": USER_COLOR, "line-width": 2, "line-opacity": 0.8},
                },
            ],
            "markers": markers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshare_geo::Coordinate;

    #[test]
    fn test_token_validation() {
        let backend = MapboxBackend;
        assert!(backend
            .validate_credential(&MapCredential::new("pk.eyJ1IjoiYm9va3NoYXJlIn0.abc"))
            .is_ok());
        assert!(backend.validate_credential(&MapCredential::new("sk.secret")).is_err());
        assert!(backend.validate_credential(&MapCredential::new("pk.")).is_err());
        assert!(backend.validate_credential(&MapCredential::new("hello")).is_err());
    }

    #[test]
    fn test_render_uses_lng_lat_order() {
        let scene = Scene {
            center: Coordinate::new(40.7128, -74.0060),
            radius_km: 5.0,
            circle: vec![Coordinate::new(40.75, -74.0), Coordinate::new(40.75, -74.0)],
            zoom: 12,
            markers: Vec::new(),
        };

        let doc = MapboxBackend.render(&scene);
        assert_eq!(doc["center"], json!([-74.0060, 40.7128]));
        assert_eq!(doc["style"], STYLE);
        assert_eq!(
            doc["sources"]["radius-circle"]["data"]["geometry"]["coordinates"][0][0],
            json!([-74.0, 40.75])
        );
        assert_eq!(doc["layers"][0]["paint"]["fill-opacity"], json!(0.1));
    }
}

//! Leaflet backend with OpenStreetMap tiles.

use super::scene::{Scene, USER_COLOR};
use super::MapBackend;
use crate::error::Result;
use bookshare_core::config::MapBackendKind;
use bookshare_core::session::MapCredential;
use serde_json::{json, Value};

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Leaflet map. OpenStreetMap tiles need no credential.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeafletBackend;

impl MapBackend for LeafletBackend {
    fn kind(&self) -> MapBackendKind {
        MapBackendKind::Leaflet
    }

    fn requires_credential(&self) -> bool {
        false
    }

    fn validate_credential(&self, _credential: &MapCredential) -> Result<()> {
        Ok(())
    }

    fn render(&self, scene: &Scene) -> Value {
        let lat_lng = |c: &bookshare_geo::Coordinate| [c.latitude, c.longitude];

        let markers: Vec<Value> = scene
            .markers
            .iter()
            .map(|m| {
                json!({
                    "id": m.listing_id,
                    "latLng": lat_lng(&m.coordinate),
                    "divIcon": {"color": m.color, "html": m.glyph},
                    "popup": m.popup,
                })
            })
            .collect();

        json!({
            "backend": self.kind().as_str(),
            "tileLayer": {"url": TILE_URL, "attribution": ATTRIBUTION},
            "center": lat_lng(&scene.center),
            "zoom": scene.zoom,
            "userMarker": {"latLng": lat_lng(&scene.center), "popup": "Your Location"},
            "circle": {
                "latLng": lat_lng(&scene.center),
                "radius": scene.radius_km * 1000.0,
                "color": USER_COLOR,
                "fillOpacity": 0.1,
            },
            "markers": markers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshare_geo::Coordinate;

    #[test]
    fn test_no_credential_needed() {
        assert!(!LeafletBackend.requires_credential());
        assert!(LeafletBackend.validate_credential(&MapCredential::new("")).is_ok());
    }

    #[test]
    fn test_render_uses_lat_lng_order() {
        let scene = Scene {
            center: Coordinate::new(48.8566, 2.3522),
            radius_km: 3.0,
            circle: Vec::new(),
            zoom: 13,
            markers: Vec::new(),
        };
        let doc = LeafletBackend.render(&scene);
        assert_eq!(doc["center"], json!([48.8566, 2.3522]));
        assert_eq!(doc["tileLayer"]["url"], TILE_URL);
    }
}

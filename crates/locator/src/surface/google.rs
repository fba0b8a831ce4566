//! Google Maps backend.

use super::scene::{Scene, USER_COLOR};
use super::MapBackend;
use crate::error::{LocatorError, Result};
use bookshare_core::config::MapBackendKind;
use bookshare_core::session::MapCredential;
use serde_json::{json, Value};

const KEY_PREFIX: &str = "AIza";
const KEY_LEN: usize = 39;

/// Google Maps JavaScript API map. Needs a browser API key.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoogleBackend;

impl MapBackend for GoogleBackend {
    fn kind(&self) -> MapBackendKind {
        MapBackendKind::Google
    }

    fn requires_credential(&self) -> bool {
        true
    }

    fn validate_credential(&self, credential: &MapCredential) -> Result<()> {
        let key = credential.expose();
        let well_formed = key.len() == KEY_LEN
            && key.starts_with(KEY_PREFIX)
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if well_formed {
            Ok(())
        } else {
            Err(LocatorError::MapInitFailure(format!(
                "Google Maps API keys are {KEY_LEN} characters starting with '{KEY_PREFIX}'"
            )))
        }
    }

    fn render(&self, scene: &Scene) -> Value {
        let lat_lng = |c: &bookshare_geo::Coordinate| json!({"lat": c.latitude, "lng": c.longitude});

        let markers: Vec<Value> = scene
            .markers
            .iter()
            .map(|m| {
                json!({
                    "id": m.listing_id,
                    "position": lat_lng(&m.coordinate),
                    "label": m.glyph,
                    "icon": {"fillColor": m.color, "fillOpacity": 1.0, "strokeColor": "#ffffff"},
                    "infoWindow": m.popup,
                })
            })
            .collect();

        json!({
            "backend": self.kind().as_str(),
            "center": lat_lng(&scene.center),
            "zoom": scene.zoom,
            "userMarker": {"position": lat_lng(&scene.center), "title": "Your Location"},
            "circle": {
                "center": lat_lng(&scene.center),
                "radius": scene.radius_km * 1000.0,
                "strokeColor": USER_COLOR,
                "strokeOpacity": 0.8,
                "strokeWeight": 2,
                "fillColor": USER_COLOR,
                "fillOpacity": 0.1,
            },
            "markers": markers,
        })
    }
}

//! Non-interactive fallback that describes the map in text.

use super::scene::Scene;
use super::MapBackend;
use crate::error::Result;
use bookshare_core::config::MapBackendKind;
use bookshare_core::session::MapCredential;
use serde_json::{json, Value};

/// Text summary in place of a map.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderBackend;

impl MapBackend for PlaceholderBackend {
    fn kind(&self) -> MapBackendKind {
        MapBackendKind::Placeholder
    }

    fn requires_credential(&self) -> bool {
        false
    }

    fn validate_credential(&self, _credential: &MapCredential) -> Result<()> {
        Ok(())
    }

    fn render(&self, scene: &Scene) -> Value {
        let noun = if scene.markers.len() == 1 { "book" } else { "books" };
        let summary = format!(
            "{} {noun} within {} km of {}",
            scene.markers.len(),
            scene.radius_km,
            scene.center
        );
        let lines: Vec<String> = scene
            .markers
            .iter()
            .map(|m| {
                format!(
                    "{} {} by {} ({}, {})",
                    m.glyph, m.popup.title, m.popup.author, m.popup.distance, m.popup.price
                )
            })
            .collect();

        json!({
            "backend": self.kind().as_str(),
            "interactive": false,
            "summary": summary,
            "lines": lines,
        })
    }
}

//! Map surface: one drawing interface over interchangeable backends.
//!
//! A [`MapSurface`] holds what should be on the map (centre, radius,
//! markers) and walks an explicit lifecycle:
//!
//! ```text
//! Uninitialized ──initialize──▶ AwaitingCredentials ──provide_credential──▶ Ready
//!        │                                                                  ▲  │
//!        └───────────initialize (no credential needed)──────────────────────┘  │
//!                                                   Ready ◀──render── Updating ◀┘ (radius, markers, centre)
//! ```
//!
//! `dispose` moves any state to `Disposed`, after which every operation
//! fails with [`LocatorError::SurfaceDisposed`]. Changes made before the
//! surface is ready are kept and drawn on the first render.

mod google;
mod leaflet;
mod mapbox;
mod placeholder;
pub mod scene;

pub use google::GoogleBackend;
pub use leaflet::LeafletBackend;
pub use mapbox::MapboxBackend;
pub use placeholder::PlaceholderBackend;
pub use scene::{Marker, Popup, Scene};

use crate::error::{LocatorError, Result};
use crate::notify::{Notification, Notifier};
use crate::radius::SearchRadius;
use bookshare_core::config::{MapBackendKind, MapConfig};
use bookshare_core::session::MapCredential;
use bookshare_geo::{circle_polygon, Coordinate, DEFAULT_CIRCLE_POINTS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A map provider adapter.
pub trait MapBackend: Send + Sync {
    /// Which provider this is.
    fn kind(&self) -> MapBackendKind;

    /// Whether a token or key is needed before drawing.
    fn requires_credential(&self) -> bool;

    /// Check a credential's shape before it is used.
    fn validate_credential(&self, credential: &MapCredential) -> Result<()>;

    /// Provider-specific document describing the scene.
    fn render(&self, scene: &Scene) -> serde_json::Value;
}

/// Backend for a configured kind.
pub fn backend_for(kind: MapBackendKind) -> Box<dyn MapBackend> {
    match kind {
        MapBackendKind::Mapbox => Box::new(MapboxBackend),
        MapBackendKind::Google => Box::new(GoogleBackend),
        MapBackendKind::Leaflet => Box::new(LeafletBackend),
        MapBackendKind::Placeholder => Box::new(PlaceholderBackend),
    }
}

/// Lifecycle of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceState {
    /// Not started
    Uninitialized,
    /// Started, but the backend still needs a credential
    AwaitingCredentials,
    /// Drawn and up to date
    Ready,
    /// Drawn, with changes not yet rendered
    Updating,
    /// Torn down
    Disposed,
}

impl SurfaceState {
    /// True once the surface can render.
    pub fn is_ready(self) -> bool {
        matches!(self, SurfaceState::Ready | SurfaceState::Updating)
    }
}

type ClickHandler = Box<dyn FnMut(&Marker) + Send>;

/// Map surface bound to one backend.
pub struct MapSurface {
    backend: Box<dyn MapBackend>,
    state: SurfaceState,
    credential: Option<MapCredential>,
    center: Option<Coordinate>,
    radius: SearchRadius,
    markers: Vec<Marker>,
    zoom: u8,
    circle_points: usize,
    on_click: Option<ClickHandler>,
    notifier: Arc<dyn Notifier>,
}

impl MapSurface {
    /// Surface drawing through `backend`.
    pub fn new(backend: Box<dyn MapBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            state: SurfaceState::Uninitialized,
            credential: None,
            center: None,
            radius: SearchRadius::default(),
            markers: Vec::new(),
            zoom: 12,
            circle_points: DEFAULT_CIRCLE_POINTS,
            on_click: None,
            notifier,
        }
    }

    /// Surface for the configured backend, zoom and circle resolution.
    pub fn from_config(config: &MapConfig, notifier: Arc<dyn Notifier>) -> Self {
        let mut surface = Self::new(backend_for(config.backend), notifier);
        surface.zoom = config.zoom;
        surface.circle_points = config.circle_points;
        surface
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Backend kind.
    pub fn backend_kind(&self) -> MapBackendKind {
        self.backend.kind()
    }

    /// Current centre, if initialized.
    pub fn center(&self) -> Option<Coordinate> {
        self.center
    }

    /// Current radius.
    pub fn radius(&self) -> SearchRadius {
        self.radius
    }

    /// Markers currently held, in insertion order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Start the surface at `center`.
    ///
    /// A ready surface ignores the call, so the map is never created twice.
    pub fn initialize(&mut self, center: Coordinate) -> Result<SurfaceState> {
        self.ensure_live()?;
        if self.state.is_ready() {
            tracing::debug!("Map surface already initialized");
            return Ok(self.state);
        }

        self.center = Some(center);
        let next = if self.backend.requires_credential() && self.credential.is_none() {
            SurfaceState::AwaitingCredentials
        } else {
            SurfaceState::Ready
        };
        self.transition(next);
        Ok(self.state)
    }

    /// Hand the backend its token or key.
    ///
    /// An invalid credential is rejected with a notification and the surface
    /// keeps waiting.
    pub fn provide_credential(&mut self, credential: MapCredential) -> Result<SurfaceState> {
        self.ensure_live()?;

        if credential.is_empty() && self.backend.requires_credential() {
            self.notifier.notify(Notification::destructive(
                "Token Required",
                format!("Please enter your {} credential to use the map.", self.backend.kind()),
            ));
            return Err(LocatorError::MapInitFailure("credential is empty".into()));
        }

        if let Err(err) = self.backend.validate_credential(&credential) {
            tracing::warn!(backend = %self.backend.kind(), error = %err, "Map credential rejected");
            self.notifier.notify(Notification::destructive(
                "Map Unavailable",
                format!("The {} credential was rejected. Please check it and try again.", self.backend.kind()),
            ));
            return Err(err);
        }

        self.credential = Some(credential);
        if self.state == SurfaceState::AwaitingCredentials {
            self.transition(SurfaceState::Ready);
        }
        Ok(self.state)
    }

    /// Change the radius circle.
    pub fn set_radius(&mut self, radius: SearchRadius) -> Result<()> {
        self.ensure_live()?;
        if self.radius != radius {
            self.radius = radius;
            self.mark_dirty();
        }
        Ok(())
    }

    /// Insert markers, replacing any with the same listing id.
    pub fn upsert_markers(&mut self, markers: impl IntoIterator<Item = Marker>) -> Result<()> {
        self.ensure_live()?;
        let mut changed = false;
        for marker in markers {
            match self.markers.iter_mut().find(|m| m.listing_id == marker.listing_id) {
                Some(existing) if *existing == marker => {}
                Some(existing) => {
                    *existing = marker;
                    changed = true;
                }
                None => {
                    self.markers.push(marker);
                    changed = true;
                }
            }
        }
        if changed {
            self.mark_dirty();
        }
        Ok(())
    }

    /// Replace every marker with `markers`.
    pub fn replace_markers(&mut self, markers: Vec<Marker>) -> Result<()> {
        self.ensure_live()?;
        if self.markers != markers {
            self.markers = markers;
            self.mark_dirty();
        }
        Ok(())
    }

    /// Remove all markers.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_live()?;
        if !self.markers.is_empty() {
            self.markers.clear();
            self.mark_dirty();
        }
        Ok(())
    }

    /// Register the handler called when a marker is clicked.
    pub fn on_marker_click<F>(&mut self, handler: F) -> Result<()>
    where
        F: FnMut(&Marker) + Send + 'static,
    {
        self.ensure_live()?;
        self.on_click = Some(Box::new(handler));
        Ok(())
    }

    /// Simulate a click on the marker for `listing_id`.
    pub fn click_marker(&mut self, listing_id: &str) -> Result<Marker> {
        self.ensure_live()?;
        let marker = self
            .markers
            .iter()
            .find(|m| m.listing_id == listing_id)
            .cloned()
            .ok_or_else(|| LocatorError::UnknownListing(listing_id.to_string()))?;

        if let Some(handler) = self.on_click.as_mut() {
            handler(&marker);
        }
        Ok(marker)
    }

    /// Move the map and the radius circle.
    pub fn recenter(&mut self, center: Coordinate) -> Result<()> {
        self.ensure_live()?;
        if self.center != Some(center) {
            self.center = Some(center);
            self.mark_dirty();
        }
        Ok(())
    }

    /// Current scene, once a centre is known.
    pub fn scene(&self) -> Option<Scene> {
        let center = self.center?;
        Some(Scene {
            center,
            radius_km: self.radius.km(),
            circle: circle_polygon(&center, self.radius.km(), self.circle_points),
            zoom: self.zoom,
            markers: self.markers.clone(),
        })
    }

    /// Draw pending changes and return the backend's document.
    pub fn render(&mut self) -> Result<serde_json::Value> {
        self.ensure_live()?;
        if !self.state.is_ready() {
            return Err(LocatorError::MapInitFailure(format!(
                "map surface is {:?}, not ready to render",
                self.state
            )));
        }
        let scene = self
            .scene()
            .ok_or_else(|| LocatorError::MapInitFailure("map surface has no centre".into()))?;

        let document = self.backend.render(&scene);
        if self.state == SurfaceState::Updating {
            self.transition(SurfaceState::Ready);
        }
        Ok(document)
    }

    /// Tear down: release markers, handler and credential. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == SurfaceState::Disposed {
            return;
        }
        self.markers.clear();
        self.on_click = None;
        self.credential = None;
        self.transition(SurfaceState::Disposed);
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state == SurfaceState::Disposed {
            Err(LocatorError::SurfaceDisposed)
        } else {
            Ok(())
        }
    }

    fn mark_dirty(&mut self) {
        if self.state == SurfaceState::Ready {
            self.transition(SurfaceState::Updating);
        }
    }

    fn transition(&mut self, next: SurfaceState) {
        tracing::info!(
            backend = %self.backend.kind(),
            from = ?self.state,
            to = ?next,
            "Map surface state changed"
        );
        self.state = next;
    }
}

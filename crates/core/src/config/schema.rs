//! Configuration schema definitions
//!
//! Every section has serde defaults, so an empty file (or no file) yields a
//! working configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest search radius a user can pick, in kilometres.
pub const MIN_RADIUS_KM: f64 = 1.0;

/// Largest search radius a user can pick, in kilometres.
pub const MAX_RADIUS_KM: f64 = 50.0;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Proximity search settings
    #[serde(default)]
    pub locator: LocatorConfig,

    /// Listing placement settings
    #[serde(default)]
    pub placement: PlacementConfig,

    /// Map surface settings
    #[serde(default)]
    pub map: MapConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Proximity search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Latitude used when device location is unavailable
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,

    /// Longitude used when device location is unavailable
    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,

    /// Radius a session starts with, in kilometres
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Ask the backend for newest listings first
    #[serde(default = "default_true")]
    pub order_by_recency: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            fallback_latitude: default_fallback_latitude(),
            fallback_longitude: default_fallback_longitude(),
            default_radius_km: default_radius_km(),
            order_by_recency: true,
        }
    }
}

fn default_fallback_latitude() -> f64 {
    40.7128
}

fn default_fallback_longitude() -> f64 {
    -74.0060
}

fn default_radius_km() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

/// How listings without a stored position are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Only stored coordinates count; unplaced listings are never nearby
    Stored,
    /// Unplaced listings get a seeded stand-in position near the user
    Synthetic,
}

/// Listing placement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Stored-only or synthetic fallback
    #[serde(default = "default_placement_mode")]
    pub mode: PlacementMode,

    /// Seed for synthetic positions
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Maximum distance of a synthetic position from the user, in kilometres
    #[serde(default = "default_spread_km")]
    pub spread_km: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            mode: default_placement_mode(),
            seed: default_seed(),
            spread_km: default_spread_km(),
        }
    }
}

fn default_placement_mode() -> PlacementMode {
    PlacementMode::Synthetic
}

fn default_seed() -> u64 {
    42
}

fn default_spread_km() -> f64 {
    4.0
}

/// Map rendering backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapBackendKind {
    /// Mapbox GL (public access token required)
    Mapbox,
    /// Google Maps JavaScript API (API key required)
    Google,
    /// Leaflet with OpenStreetMap tiles
    Leaflet,
    /// Static, non-interactive summary
    Placeholder,
}

impl MapBackendKind {
    /// Every backend, in the order they are offered to users.
    pub const ALL: [MapBackendKind; 4] = [
        MapBackendKind::Mapbox,
        MapBackendKind::Google,
        MapBackendKind::Leaflet,
        MapBackendKind::Placeholder,
    ];

    /// Lowercase name used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            MapBackendKind::Mapbox => "mapbox",
            MapBackendKind::Google => "google",
            MapBackendKind::Leaflet => "leaflet",
            MapBackendKind::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for MapBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapBackendKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = MapBackendKind::ALL.iter().map(MapBackendKind::as_str).collect();
                format!("unknown map backend '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Map surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Rendering backend
    #[serde(default = "default_backend")]
    pub backend: MapBackendKind,

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Vertices used for the radius circle
    #[serde(default = "default_circle_points")]
    pub circle_points: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            zoom: default_zoom(),
            circle_points: default_circle_points(),
        }
    }
}

fn default_backend() -> MapBackendKind {
    MapBackendKind::Mapbox
}

fn default_zoom() -> u8 {
    12
}

fn default_circle_points() -> usize {
    64
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

//! Where is the user?
//!
//! A [`GeolocationProvider`] is asked once per resolution. Anything other
//! than a valid coordinate falls back to a configured position, so callers
//! always get somewhere to centre the map.

use crate::error::LocatorError;
use crate::notify::{Notification, Notifier};
use bookshare_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Position used when the device cannot provide one (New York City).
pub const DEFAULT_FALLBACK: Coordinate = Coordinate::new(40.7128, -74.0060);

/// Why a provider could not report a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user refused access
    #[error("permission denied")]
    PermissionDenied,
    /// The platform has no geolocation
    #[error("geolocation not supported")]
    Unsupported,
    /// Access was granted but no fix was obtained
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

impl From<GeolocationError> for LocatorError {
    fn from(err: GeolocationError) -> Self {
        LocatorError::LocationUnavailable(err.to_string())
    }
}

/// Source of device positions.
pub trait GeolocationProvider: Send + Sync {
    /// Request the current position once.
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// Provider that always answers the same way.
///
/// Front ends without a device sensor use it with a coordinate taken from
/// flags or configuration, or with no coordinate at all.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    outcome: Result<Coordinate, GeolocationError>,
}

impl StaticProvider {
    /// Always reports `coordinate`.
    pub fn at(coordinate: Coordinate) -> Self {
        Self { outcome: Ok(coordinate) }
    }

    /// Reports `coordinate` when given, otherwise behaves as unsupported.
    pub fn from_option(coordinate: Option<Coordinate>) -> Self {
        coordinate.map_or_else(Self::unsupported, Self::at)
    }

    /// Always fails with the given error.
    pub fn failing(error: GeolocationError) -> Self {
        Self { outcome: Err(error) }
    }

    /// Platform without geolocation.
    pub fn unsupported() -> Self {
        Self::failing(GeolocationError::Unsupported)
    }

    /// User refused access.
    pub fn denied() -> Self {
        Self::failing(GeolocationError::PermissionDenied)
    }
}

impl GeolocationProvider for StaticProvider {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.outcome.clone()
    }
}

/// Where a resolved position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// Reported by the provider
    Device,
    /// Configured fallback
    Fallback,
}

/// Outcome of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Position to centre on
    pub coordinate: Coordinate,
    /// Where it came from
    pub source: LocationSource,
}

/// Turns provider answers into a usable position plus a notification.
pub struct LocationResolver<P> {
    provider: P,
    fallback: Coordinate,
    notifier: Arc<dyn Notifier>,
}

impl<P: GeolocationProvider> LocationResolver<P> {
    /// Resolver with the default fallback.
    pub fn new(provider: P, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            provider,
            fallback: DEFAULT_FALLBACK,
            notifier,
        }
    }

    /// Replace the fallback position. Invalid coordinates are ignored.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        if fallback.is_valid() {
            self.fallback = fallback;
        } else {
            tracing::warn!(%fallback, "Ignoring invalid fallback coordinate");
        }
        self
    }

    /// Position used when the device gives none.
    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    /// Ask the provider once and settle on a position.
    ///
    /// Emits exactly one notification per call.
    pub async fn resolve(&self) -> ResolvedLocation {
        let answer = self.provider.current_position().await;

        match answer {
            Ok(coordinate) if coordinate.is_valid() => {
                tracing::info!(%coordinate, "Device location resolved");
                self.notifier.notify(Notification::info(
                    "Location Found",
                    "Your location has been updated successfully.",
                ));
                ResolvedLocation {
                    coordinate,
                    source: LocationSource::Device,
                }
            }
            Ok(coordinate) => {
                tracing::warn!(%coordinate, "Provider returned an out-of-range position");
                self.fall_back(location_access_failed())
            }
            Err(GeolocationError::Unsupported) => {
                tracing::warn!("Geolocation unsupported, using fallback");
                self.fall_back(Notification::destructive(
                    "Geolocation Not Supported",
                    "Your device doesn't support geolocation.",
                ))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Geolocation failed, using fallback");
                self.fall_back(location_access_failed())
            }
        }
    }

    fn fall_back(&self, notification: Notification) -> ResolvedLocation {
        self.notifier.notify(notification);
        ResolvedLocation {
            coordinate: self.fallback,
            source: LocationSource::Fallback,
        }
    }
}

fn location_access_failed() -> Notification {
    Notification::destructive(
        "Location Access",
        "Could not get your location. Please enable location services.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{RecordingNotifier, Severity};

    fn resolver(provider: StaticProvider) -> (LocationResolver<StaticProvider>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (LocationResolver::new(provider, notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_device_position_is_used() {
        let here = Coordinate::new(51.5074, -0.1278);
        let (resolver, notifier) = resolver(StaticProvider::at(here));

        let resolved = resolver.resolve().await;
        assert_eq!(resolved.coordinate, here);
        assert_eq!(resolved.source, LocationSource::Device);

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Location Found");
        assert_eq!(notes[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_denial_falls_back_with_one_notification() {
        let (resolver, notifier) = resolver(StaticProvider::denied());

        let resolved = resolver.resolve().await;
        assert_eq!(resolved.coordinate, Coordinate::new(40.7128, -74.0060));
        assert_eq!(resolved.source, LocationSource::Fallback);

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Location Access");
        assert!(notes[0].is_destructive());
    }

    #[tokio::test]
    async fn test_unsupported_falls_back() {
        let (resolver, notifier) = resolver(StaticProvider::from_option(None));

        let resolved = resolver.resolve().await;
        assert_eq!(resolved.coordinate, DEFAULT_FALLBACK);
        assert_eq!(notifier.titles(), vec!["Geolocation Not Supported"]);
    }

    #[tokio::test]
    async fn test_invalid_position_and_unavailable_fall_back() {
        let (resolver, notifier) = resolver(StaticProvider::at(Coordinate::new(120.0, 0.0)));
        assert_eq!(resolver.resolve().await.source, LocationSource::Fallback);

        let unavailable = LocationResolver::new(
            StaticProvider::failing(GeolocationError::Unavailable("timeout".into())),
            notifier.clone(),
        );
        assert_eq!(unavailable.resolve().await.source, LocationSource::Fallback);

        assert_eq!(notifier.count_titled("Location Access"), 2);
    }

    #[tokio::test]
    async fn test_custom_fallback() {
        let campus = Coordinate::new(42.3736, -71.1097);
        let (resolver, _) = resolver(StaticProvider::denied());
        let resolver = resolver.with_fallback(campus).with_fallback(Coordinate::new(0.0, 500.0));

        assert_eq!(resolver.fallback(), campus);
        assert_eq!(resolver.resolve().await.coordinate, campus);
    }
}

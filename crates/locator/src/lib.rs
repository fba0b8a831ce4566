//! Proximity book locator for BookShare.
//!
//! This crate provides:
//! - Location resolution with a fixed fallback position
//! - Fail-open listing fetch from the backend
//! - Stable per-listing placement and radius filtering
//! - A map surface with Mapbox, Google, Leaflet and text backends
//! - Locator orchestration with cancellation on teardown
//! - Catalog search and inventory alerts over the same listings
//!
//! # Example
//!
//! ```
//! use bookshare_locator::prelude::*;
//! use bookshare_geo::Coordinate;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::new());
//! let store = StaticStore::new(vec![
//!     BookListing::new("b1", "Calculus", "Stewart").with_coordinate(Coordinate::new(40.72, -74.0)),
//! ]);
//!
//! let mut locator = ProximityLocator::new(
//!     LocationResolver::new(StaticProvider::at(Coordinate::new(40.7128, -74.006)), notifier.clone()),
//!     ListingFetcher::new(store, notifier.clone()),
//!     MapSurface::new(backend_for(MapBackendKind::Placeholder), notifier),
//! );
//!
//! locator.refresh().await.unwrap();
//! assert_eq!(locator.nearby().len(), 1);
//! # });
//! ```

pub mod alerts;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod listing;
pub mod location;
pub mod locator;
pub mod notify;
pub mod placement;
pub mod radius;
pub mod search;
pub mod surface;

pub use error::{LocatorError, LocatorErrorCode, Result};
pub use listing::{BookListing, Condition, ListingType};
pub use locator::{LocatorHandle, Outcome, ProximityLocator};
pub use radius::SearchRadius;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::alerts::{Alert, AlertBook, AlertDraft};
    pub use crate::error::{LocatorError, Result};
    pub use crate::fetch::{FetchOptions, ListingFetcher, ListingStore, StaticStore};
    pub use crate::filter::{nearby, NearbyListing};
    pub use crate::listing::{BookListing, Condition, ListingType};
    pub use crate::location::{GeolocationProvider, LocationResolver, LocationSource, StaticProvider};
    pub use crate::locator::{LocatorHandle, Outcome, ProximityLocator};
    pub use crate::notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
    pub use crate::placement::{PlacementCache, PlacementPolicy};
    pub use crate::radius::SearchRadius;
    pub use crate::search::ListingQuery;
    pub use crate::surface::{backend_for, MapBackend, MapSurface, SurfaceState};
    pub use bookshare_core::config::MapBackendKind;
}

//! Locator orchestration.
//!
//! [`ProximityLocator`] ties the pieces together: it resolves the user's
//! position and loads listings concurrently, pins listings to coordinates,
//! filters them by radius and keeps the map surface in step.
//!
//! All state lives behind `&mut self`, so updates are serialised. Teardown
//! cancels the locator's token; anything in flight at that moment finishes
//! as [`Outcome::Cancelled`] and writes nothing.

use crate::error::{LocatorError, Result};
use crate::fetch::{FetchOptions, ListingFetcher, ListingStore};
use crate::filter::{nearby_within, NearbyListing};
use crate::listing::BookListing;
use crate::location::{GeolocationProvider, LocationResolver, ResolvedLocation};
use crate::notify::Notifier;
use crate::placement::{PlacementCache, PlacementPolicy};
use crate::radius::SearchRadius;
use crate::surface::{MapSurface, Marker, SurfaceState};
use bookshare_core::config::ConfigSchema;
use bookshare_core::session::{MapCredential, Session};
use bookshare_geo::Coordinate;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Whether an async step got to write its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Results were applied
    Applied,
    /// The locator was torn down first; nothing was written
    Cancelled,
}

/// Cancels a locator from another task.
#[derive(Debug, Clone)]
pub struct LocatorHandle {
    token: CancellationToken,
}

impl LocatorHandle {
    /// Stop in-flight work. The owner should still call `dispose`.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Finds listings around the user and keeps a map surface in sync.
pub struct ProximityLocator<G, S> {
    resolver: LocationResolver<G>,
    fetcher: ListingFetcher<S>,
    placement: PlacementCache,
    radius: SearchRadius,
    location: Option<ResolvedLocation>,
    listings: Vec<BookListing>,
    nearby: Vec<NearbyListing>,
    surface: MapSurface,
    token: CancellationToken,
    selected: Arc<Mutex<Option<String>>>,
}

impl<G, S> ProximityLocator<G, S>
where
    G: GeolocationProvider,
    S: ListingStore,
{
    /// Locator over the given parts with the default radius and placement.
    pub fn new(resolver: LocationResolver<G>, fetcher: ListingFetcher<S>, mut surface: MapSurface) -> Self {
        let selected = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&selected);
        if let Err(err) = surface.on_marker_click(move |marker: &Marker| {
            if let Ok(mut current) = sink.lock() {
                *current = Some(marker.listing_id.clone());
            }
        }) {
            tracing::warn!(error = %err, "Could not register marker click handler");
        }

        Self {
            resolver,
            fetcher,
            placement: PlacementCache::default(),
            radius: SearchRadius::default(),
            location: None,
            listings: Vec::new(),
            nearby: Vec::new(),
            surface,
            token: CancellationToken::new(),
            selected,
        }
    }

    /// Locator wired from configuration.
    pub fn from_config(config: &ConfigSchema, provider: G, store: S, notifier: Arc<dyn Notifier>) -> Self {
        let fallback = Coordinate::new(config.locator.fallback_latitude, config.locator.fallback_longitude);
        let resolver = LocationResolver::new(provider, Arc::clone(&notifier)).with_fallback(fallback);

        let options = FetchOptions {
            order_by_recency: config.locator.order_by_recency,
            limit: None,
        };
        let fetcher = ListingFetcher::new(store, Arc::clone(&notifier)).with_options(options);
        let surface = MapSurface::from_config(&config.map, notifier);

        Self::new(resolver, fetcher, surface)
            .with_placement(PlacementPolicy::from(&config.placement))
            .with_radius(SearchRadius::clamped(config.locator.default_radius_km))
    }

    /// Replace the placement policy.
    #[must_use]
    pub fn with_placement(mut self, policy: PlacementPolicy) -> Self {
        self.placement = PlacementCache::new(policy);
        self
    }

    /// Start with `radius` instead of the default.
    #[must_use]
    pub fn with_radius(mut self, radius: SearchRadius) -> Self {
        self.radius = radius;
        if let Err(err) = self.surface.set_radius(radius) {
            tracing::warn!(error = %err, "Could not set initial map radius");
        }
        self
    }

    /// Handle that can cancel this locator from elsewhere.
    pub fn handle(&self) -> LocatorHandle {
        LocatorHandle {
            token: self.token.clone(),
        }
    }

    /// Resolve location and load listings concurrently, then recompute.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn refresh(&mut self) -> Result<Outcome> {
        self.ensure_live()?;
        let token = self.token.clone();

        let (location, listings) = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::info!("Refresh cancelled, dropping results");
                return Ok(Outcome::Cancelled);
            }
            results = async { tokio::join!(self.resolver.resolve(), self.fetcher.fetch()) } => results,
        };

        self.listings = listings;
        self.apply_location(location)?;
        Ok(Outcome::Applied)
    }

    /// Resolve location only.
    pub async fn update_location(&mut self) -> Result<Outcome> {
        self.ensure_live()?;
        let token = self.token.clone();

        let location = tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(Outcome::Cancelled),
            location = self.resolver.resolve() => location,
        };

        self.apply_location(location)?;
        Ok(Outcome::Applied)
    }

    /// Reload listings only.
    pub async fn reload_listings(&mut self) -> Result<Outcome> {
        self.ensure_live()?;
        let token = self.token.clone();

        let listings = tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(Outcome::Cancelled),
            listings = self.fetcher.fetch() => listings,
        };

        self.listings = listings;
        self.recompute()?;
        Ok(Outcome::Applied)
    }

    /// Change the search radius. Out-of-range values are rejected and
    /// leave the current radius in place.
    pub fn set_radius(&mut self, km: f64) -> Result<()> {
        self.ensure_live()?;
        let radius = SearchRadius::new(km)?;
        self.radius = radius;
        self.surface.set_radius(radius)?;
        self.recompute()
    }

    /// Give the map its credential and start it at the current location.
    pub fn provide_credential(&mut self, credential: MapCredential) -> Result<SurfaceState> {
        self.ensure_live()?;
        let state = self.surface.provide_credential(credential)?;
        match (state, self.location) {
            (SurfaceState::Uninitialized, Some(location)) => self.surface.initialize(location.coordinate),
            _ => Ok(state),
        }
    }

    /// Hand over what the session carries for the map. Without a credential
    /// in the session nothing changes and `None` comes back.
    pub fn use_session(&mut self, session: &Session) -> Result<Option<SurfaceState>> {
        match &session.map_credential {
            Some(credential) => self.provide_credential(credential.clone()).map(Some),
            None => Ok(None),
        }
    }

    /// Draw the map with everything applied so far.
    pub fn render(&mut self) -> Result<serde_json::Value> {
        self.ensure_live()?;
        self.surface.render()
    }

    /// Listings inside the radius, nearest first.
    pub fn nearby(&self) -> &[NearbyListing] {
        &self.nearby
    }

    /// Every listing from the last fetch.
    pub fn listings(&self) -> &[BookListing] {
        &self.listings
    }

    /// Current position, once resolved.
    pub fn location(&self) -> Option<ResolvedLocation> {
        self.location
    }

    /// Current radius.
    pub fn radius(&self) -> SearchRadius {
        self.radius
    }

    /// Map surface.
    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    /// Id of the listing whose marker was last clicked.
    pub fn selected(&self) -> Option<String> {
        self.selected.lock().ok().and_then(|current| current.clone())
    }

    /// Select a listing as if its marker was clicked.
    pub fn select(&mut self, listing_id: &str) -> Result<Marker> {
        self.ensure_live()?;
        self.surface.click_marker(listing_id)
    }

    /// True once torn down or cancelled through a handle.
    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel in-flight work and tear the surface down. Idempotent.
    pub fn dispose(&mut self) {
        self.token.cancel();
        self.surface.dispose();
        self.nearby.clear();
        if let Ok(mut current) = self.selected.lock() {
            *current = None;
        }
        tracing::debug!("Locator disposed");
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            Err(LocatorError::SurfaceDisposed)
        } else {
            Ok(())
        }
    }

    fn apply_location(&mut self, location: ResolvedLocation) -> Result<()> {
        let center = location.coordinate;
        self.location = Some(location);

        if self.surface.state() == SurfaceState::Uninitialized {
            self.surface.initialize(center)?;
        } else {
            self.surface.recenter(center)?;
        }
        self.recompute()
    }

    fn recompute(&mut self) -> Result<()> {
        let Some(location) = self.location else {
            return Ok(());
        };
        let center = location.coordinate;

        self.placement
            .retain_ids(self.listings.iter().map(|listing| listing.id.as_str()));
        let placed = self.placement.place_all(&self.listings, &center);
        self.nearby = nearby_within(&placed, &center, self.radius);

        if let Ok(mut current) = self.selected.lock() {
            let still_visible = current
                .as_deref()
                .is_none_or(|id| self.nearby.iter().any(|hit| hit.id() == id));
            if !still_visible {
                *current = None;
            }
        }

        tracing::debug!(
            listings = self.listings.len(),
            nearby = self.nearby.len(),
            radius_km = self.radius.km(),
            "Nearby listings recomputed"
        );
        self.surface
            .replace_markers(self.nearby.iter().map(Marker::from_nearby).collect())
    }
}

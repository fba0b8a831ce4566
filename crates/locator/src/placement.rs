//! Fixed map positions for listings.
//!
//! Every listing gets one coordinate for the whole session. The same value
//! feeds the radius filter, the distance shown in lists and the marker on the
//! map, so the three can never disagree.

use crate::listing::BookListing;
use bookshare_core::config::{PlacementConfig, PlacementMode};
use bookshare_geo::{Coordinate, Located, SyntheticPlacer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How listings without a stored coordinate are handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementPolicy {
    /// Only stored coordinates; unplaced listings are never nearby
    Stored,
    /// Stored coordinates, else a seeded synthetic point near the anchor
    Synthetic {
        /// Seed shared by every placement
        seed: u64,
        /// Maximum distance from the anchor in kilometres
        spread_km: f64,
    },
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        PlacementPolicy::Synthetic {
            seed: 42,
            spread_km: 4.0,
        }
    }
}

impl From<&PlacementConfig> for PlacementPolicy {
    fn from(config: &PlacementConfig) -> Self {
        match config.mode {
            PlacementMode::Stored => PlacementPolicy::Stored,
            PlacementMode::Synthetic => PlacementPolicy::Synthetic {
                seed: config.seed,
                spread_km: config.spread_km,
            },
        }
    }
}

/// Where a placed coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementSource {
    /// Stored with the listing
    Stored,
    /// Generated from the seed
    Synthetic,
}

/// A listing pinned to one coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedListing {
    /// The listing
    pub listing: BookListing,
    /// Its coordinate for the session
    pub coordinate: Coordinate,
    /// Where the coordinate came from
    pub source: PlacementSource,
}

impl Located for PlacedListing {
    fn id(&self) -> &str {
        &self.listing.id
    }

    fn coordinate(&self) -> Option<Coordinate> {
        Some(self.coordinate)
    }
}

/// Remembers each listing's coordinate once it has been decided.
#[derive(Debug, Clone, Default)]
pub struct PlacementCache {
    policy: PlacementPolicy,
    placed: HashMap<String, (Coordinate, PlacementSource)>,
}

impl PlacementCache {
    /// Empty cache using `policy`.
    pub fn new(policy: PlacementPolicy) -> Self {
        Self {
            policy,
            placed: HashMap::new(),
        }
    }

    /// Policy in use.
    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    /// Number of listings placed so far.
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// True when nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Coordinate for `listing`, computing it on first sight.
    ///
    /// Synthetic points are anchored at `anchor` when first computed and do
    /// not move if the anchor later changes. A stored coordinate that appears
    /// after a synthetic placement replaces it.
    pub fn place(&mut self, listing: &BookListing, anchor: &Coordinate) -> Option<PlacedListing> {
        if let Some(stored) = listing.stored_coordinate {
            self.placed
                .insert(listing.id.clone(), (stored, PlacementSource::Stored));
            return Some(PlacedListing {
                listing: listing.clone(),
                coordinate: stored,
                source: PlacementSource::Stored,
            });
        }

        let PlacementPolicy::Synthetic { seed, spread_km } = self.policy else {
            return None;
        };

        let (coordinate, source) = *self
            .placed
            .entry(listing.id.clone())
            .or_insert_with(|| {
                let placer = SyntheticPlacer::new(seed, spread_km);
                (placer.place(&listing.id, anchor), PlacementSource::Synthetic)
            });

        Some(PlacedListing {
            listing: listing.clone(),
            coordinate,
            source,
        })
    }

    /// Place every listing that can be placed, keeping input order.
    pub fn place_all(&mut self, listings: &[BookListing], anchor: &Coordinate) -> Vec<PlacedListing> {
        listings
            .iter()
            .filter_map(|listing| self.place(listing, anchor))
            .collect()
    }

    /// Forget placements for listings no longer present.
    pub fn retain_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = ids.into_iter().collect();
        self.placed.retain(|id, _| keep.contains(id.as_str()));
    }
}

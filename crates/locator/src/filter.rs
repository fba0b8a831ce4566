//! Proximity filter.

use crate::placement::PlacedListing;
use crate::radius::SearchRadius;
use bookshare_geo::{haversine_distance, within_radius, Coordinate};
use serde::{Deserialize, Serialize};

/// A placed listing inside the search radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyListing {
    /// The listing and its coordinate
    pub placed: PlacedListing,
    /// Distance from the search centre in kilometres
    pub distance_km: f64,
}

impl NearbyListing {
    /// Listing id.
    pub fn id(&self) -> &str {
        &self.placed.listing.id
    }

    /// Distance rounded for display, e.g. `"2.4 km away"`.
    pub fn distance_label(&self) -> String {
        format!("{:.1} km away", self.distance_km)
    }
}

/// Great-circle distance in kilometres.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_distance(a, b)
}

/// Listings whose placed coordinate lies within `radius_km` of `center`.
///
/// Closest first; equal distances keep input order. `radius_km` is not
/// range-checked so callers can filter with any non-negative radius.
pub fn nearby(placed: &[PlacedListing], center: &Coordinate, radius_km: f64) -> Vec<NearbyListing> {
    within_radius(center, placed, radius_km)
        .into_iter()
        .map(|hit| NearbyListing {
            placed: hit.item.clone(),
            distance_km: hit.distance_km,
        })
        .collect()
}

/// [`nearby`] with a validated radius.
pub fn nearby_within(placed: &[PlacedListing], center: &Coordinate, radius: SearchRadius) -> Vec<NearbyListing> {
    nearby(placed, center, radius.km())
}

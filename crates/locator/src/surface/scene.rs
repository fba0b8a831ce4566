//! What a map backend is asked to draw.

use crate::filter::NearbyListing;
use crate::listing::ListingType;
use bookshare_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Colour of the user marker and the radius circle.
pub const USER_COLOR: &str = "#3b82f6";

/// Marker colour for a listing type.
pub fn marker_color(listing_type: ListingType) -> &'static str {
    match listing_type {
        ListingType::Free => "#10b981",
        ListingType::Exchange => "#3b82f6",
        ListingType::Sell => "#f59e0b",
        ListingType::Unknown => "#6b7280",
    }
}

/// Marker glyph for a listing type.
pub fn marker_glyph(listing_type: ListingType) -> &'static str {
    match listing_type {
        ListingType::Sell => "$",
        ListingType::Exchange => "↔",
        ListingType::Free => "★",
        ListingType::Unknown => "📖",
    }
}

/// Text shown when a marker is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    /// Book title
    pub title: String,
    /// Book author
    pub author: String,
    /// e.g. `"2.4 km away"`
    pub distance: String,
    /// Condition label
    pub condition: String,
    /// Price label
    pub price: String,
    /// Pickup location
    pub location: String,
}

/// One listing on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Listing id
    pub listing_id: String,
    /// Where to draw it
    pub coordinate: Coordinate,
    /// Listing type, which decides colour and glyph
    pub listing_type: ListingType,
    /// Fill colour
    pub color: String,
    /// Glyph drawn inside the marker
    pub glyph: String,
    /// Popup text
    pub popup: Popup,
}

impl Marker {
    /// Marker for a listing inside the radius.
    pub fn from_nearby(hit: &NearbyListing) -> Self {
        let listing = &hit.placed.listing;
        Self {
            listing_id: listing.id.clone(),
            coordinate: hit.placed.coordinate,
            listing_type: listing.listing_type,
            color: marker_color(listing.listing_type).to_string(),
            glyph: marker_glyph(listing.listing_type).to_string(),
            popup: Popup {
                title: listing.title.clone(),
                author: listing.author.clone(),
                distance: hit.distance_label(),
                condition: listing.condition.to_string(),
                price: listing.price_label(),
                location: listing.location_label.clone(),
            },
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Map centre and user position
    pub center: Coordinate,
    /// Search radius in kilometres
    pub radius_km: f64,
    /// Closed ring approximating the radius circle
    pub circle: Vec<Coordinate>,
    /// Initial zoom level
    pub zoom: u8,
    /// Listing markers
    pub markers: Vec<Marker>,
}

impl Scene {
    /// Circle ring as GeoJSON positions (`[lng, lat]`).
    pub fn circle_lng_lat(&self) -> Vec<[f64; 2]> {
        self.circle.iter().map(Coordinate::to_lng_lat).collect()
    }
}

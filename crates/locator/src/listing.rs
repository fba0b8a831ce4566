//! Book listings as the locator sees them.

use bookshare_api_client::endpoints::books::BookRow;
use bookshare_geo::{parse_postgis_point, Coordinate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical condition of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Unused
    New,
    /// Barely used
    LikeNew,
    /// Normal wear
    Good,
    /// Heavy wear
    Fair,
    /// Damaged but usable
    Poor,
    /// Not one of the known labels
    Unknown,
}

impl Condition {
    /// Conditions a seller can choose, best first.
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
    ];

    /// Parse a backend label. Unrecognised labels become [`Condition::Unknown`].
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "new" => Condition::New,
            "like-new" | "like new" | "like_new" => Condition::LikeNew,
            "good" => Condition::Good,
            "fair" => Condition::Fair,
            "poor" => Condition::Poor,
            _ => Condition::Unknown,
        }
    }

    /// Backend label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like-new",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
            Condition::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a book changes hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    /// For a price
    Sell,
    /// Swap for another book
    Exchange,
    /// Giveaway
    Free,
    /// Not one of the known labels
    Unknown,
}

impl ListingType {
    /// Types a seller can choose.
    pub const ALL: [ListingType; 3] = [ListingType::Sell, ListingType::Exchange, ListingType::Free];

    /// Parse a backend label. Unrecognised labels become [`ListingType::Unknown`].
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "sell" => ListingType::Sell,
            "exchange" => ListingType::Exchange,
            "free" => ListingType::Free,
            _ => ListingType::Unknown,
        }
    }

    /// Backend label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sell => "sell",
            ListingType::Exchange => "exchange",
            ListingType::Free => "free",
            ListingType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A book offered on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookListing {
    /// Listing id
    pub id: String,
    /// Title
    pub title: String,
    /// Author(s)
    pub author: String,
    /// Course the book is used for
    pub course_code: Option<String>,
    /// Catalog category
    pub category: String,
    /// Condition
    pub condition: Condition,
    /// How the book changes hands
    pub listing_type: ListingType,
    /// Asking price
    pub price: Option<f64>,
    /// Free-text pickup location, never geocoded
    pub location_label: String,
    /// Seller verified by the campus
    pub verified: bool,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Coordinate stored with the listing, if any
    pub stored_coordinate: Option<Coordinate>,
}

impl BookListing {
    /// Minimal listing, mostly useful for tests and fixtures.
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            course_code: None,
            category: String::new(),
            condition: Condition::Unknown,
            listing_type: ListingType::Unknown,
            price: None,
            location_label: String::new(),
            verified: false,
            created_at: None,
            stored_coordinate: None,
        }
    }

    /// Set the listing type and price.
    #[must_use]
    pub fn with_offer(mut self, listing_type: ListingType, price: Option<f64>) -> Self {
        self.listing_type = listing_type;
        self.price = price;
        self
    }

    /// Set the catalog category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Set the course code.
    #[must_use]
    pub fn with_course_code(mut self, code: impl Into<String>) -> Self {
        self.course_code = Some(code.into());
        self
    }

    /// Set the pickup location label.
    #[must_use]
    pub fn with_location_label(mut self, label: impl Into<String>) -> Self {
        self.location_label = label.into();
        self
    }

    /// Set the stored coordinate. Invalid coordinates are dropped.
    #[must_use]
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.stored_coordinate = coordinate.is_valid().then_some(coordinate);
        self
    }

    /// Price as shown to buyers.
    pub fn price_label(&self) -> String {
        price_label(self.listing_type, self.price)
    }
}

/// Format a price for display.
///
/// Free and exchange listings ignore the price. A missing or zero price reads
/// "Contact for price".
pub fn price_label(listing_type: ListingType, price: Option<f64>) -> String {
    match listing_type {
        ListingType::Free => "Free".to_string(),
        ListingType::Exchange => "Exchange".to_string(),
        ListingType::Sell | ListingType::Unknown => match price {
            Some(p) if p.is_finite() && p > 0.0 => {
                if p.fract() == 0.0 {
                    format!("${p:.0}")
                } else {
                    format!("${p:.2}")
                }
            }
            _ => "Contact for price".to_string(),
        },
    }
}

impl From<BookRow> for BookListing {
    fn from(row: BookRow) -> Self {
        let stored_coordinate = stored_coordinate(&row);
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            course_code: row.course_code.filter(|c| !c.trim().is_empty()),
            category: row.category.unwrap_or_default(),
            condition: row.condition.as_deref().map_or(Condition::Unknown, Condition::parse),
            listing_type: row
                .listing_type
                .as_deref()
                .map_or(ListingType::Unknown, ListingType::parse),
            price: row.price,
            location_label: row.location.unwrap_or_default(),
            verified: row.verified,
            created_at: row.created_at,
            stored_coordinate,
        }
    }
}

/// Latitude/longitude columns win; the PostGIS point is the fallback.
fn stored_coordinate(row: &BookRow) -> Option<Coordinate> {
    if let (Some(lat), Some(lng)) = (row.latitude, row.longitude) {
        if let Ok(coord) = Coordinate::checked(lat, lng) {
            return Some(coord);
        }
        tracing::debug!(id = %row.id, lat, lng, "Discarding out-of-range stored coordinate");
    }
    row.location_point.as_ref().and_then(parse_postgis_point)
}

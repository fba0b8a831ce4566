//! Books API endpoints
//!
//! Maps to the PostgREST `books` collection:
//! - List active listings, optionally newest first

use crate::client::BookshareClient;
use crate::error::ApiResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Collection path below the PostgREST root
const BOOKS_PATH: &str = "books";

/// Books API interface
#[derive(Clone)]
pub struct BooksApi {
    client: BookshareClient,
}

impl BooksApi {
    /// Create a new books API interface
    pub(crate) fn new(client: BookshareClient) -> Self {
        Self { client }
    }

    /// List listings whose status is `active`
    ///
    /// GET /rest/v1/books?select=*&status=eq.active[&order=created_at.desc][&limit=n]
    pub async fn list_active(&self, params: &ListBooksParams) -> ApiResult<Vec<BookRow>> {
        self.client.get(BOOKS_PATH, &params.query_pairs()).await
    }

    /// List active listings with timing
    pub async fn list_active_timed(
        &self,
        params: &ListBooksParams,
    ) -> ApiResult<(Vec<BookRow>, Duration)> {
        self.client.timed_get(BOOKS_PATH, &params.query_pairs()).await
    }
}

/// Parameters for listing books
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListBooksParams {
    /// Order by `created_at` descending
    pub order_by_recency: bool,
    /// Maximum rows to return
    pub limit: Option<u32>,
}

impl ListBooksParams {
    /// Newest listings first, no limit
    #[must_use]
    pub fn newest_first() -> Self {
        Self {
            order_by_recency: true,
            limit: None,
        }
    }

    /// Cap the number of rows
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// PostgREST query string pairs
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("select", "*".to_string()),
            ("status", "eq.active".to_string()),
        ];
        if self.order_by_recency {
            pairs.push(("order", "created_at.desc".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// One row of the `books` collection
///
/// Only `id`, `title` and `author` are guaranteed; everything else is
/// defaulted so partially filled rows still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRow {
    /// Listing id
    pub id: String,
    /// Book title
    pub title: String,
    /// Book author(s)
    pub author: String,
    /// Course the book is used for, e.g. `CS101`
    #[serde(default)]
    pub course_code: Option<String>,
    /// Catalog category
    #[serde(default)]
    pub category: Option<String>,
    /// Condition label (`new`, `like-new`, `good`, `fair`, `poor`)
    #[serde(default)]
    pub condition: Option<String>,
    /// Listing type (`sell`, `exchange`, `free`)
    #[serde(default)]
    pub listing_type: Option<String>,
    /// Asking price
    #[serde(default)]
    pub price: Option<f64>,
    /// Free-text pickup location
    #[serde(default)]
    pub location: Option<String>,
    /// Seller verified by the campus
    #[serde(default)]
    pub verified: bool,
    /// Listing status
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Latitude column, when the listing was geocoded
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude column, when the listing was geocoded
    #[serde(default)]
    pub longitude: Option<f64>,
    /// PostGIS point, as GeoJSON or WKT
    #[serde(default)]
    pub location_point: Option<serde_json::Value>,
    /// Seller id
    #[serde(default)]
    pub user_id: Option<String>,
}

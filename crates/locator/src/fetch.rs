//! Loading active listings.

use crate::error::LocatorError;
use crate::listing::BookListing;
use crate::notify::{Notification, Notifier};
use bookshare_api_client::endpoints::books::{BooksApi, ListBooksParams};
use std::future::Future;
use std::sync::Arc;

/// What to ask the store for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Newest listings first
    pub order_by_recency: bool,
    /// Maximum number of listings
    pub limit: Option<u32>,
}

impl FetchOptions {
    /// Newest first, unbounded.
    pub fn newest_first() -> Self {
        Self {
            order_by_recency: true,
            limit: None,
        }
    }
}

/// Read access to listings whose status is `active`.
pub trait ListingStore: Send + Sync {
    /// Load active listings.
    fn fetch_active(
        &self,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<Vec<BookListing>, LocatorError>> + Send;
}

impl ListingStore for BooksApi {
    async fn fetch_active(&self, options: &FetchOptions) -> Result<Vec<BookListing>, LocatorError> {
        let params = ListBooksParams {
            order_by_recency: options.order_by_recency,
            limit: options.limit,
        };
        let (rows, elapsed) = self.list_active_timed(&params).await?;
        tracing::debug!(rows = rows.len(), elapsed_ms = elapsed.as_millis(), "Fetched active books");
        Ok(rows.into_iter().map(BookListing::from).collect())
    }
}

/// In-memory store, for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticStore {
    listings: Result<Vec<BookListing>, String>,
}

impl StaticStore {
    /// Store holding `listings`, in the given order.
    pub fn new(listings: Vec<BookListing>) -> Self {
        Self { listings: Ok(listings) }
    }

    /// Store whose every fetch fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            listings: Err(reason.into()),
        }
    }
}

impl Default for StaticStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ListingStore for StaticStore {
    async fn fetch_active(&self, options: &FetchOptions) -> Result<Vec<BookListing>, LocatorError> {
        let mut listings = self
            .listings
            .clone()
            .map_err(LocatorError::FetchFailure)?;

        if options.order_by_recency {
            // Stable: undated listings keep their relative order at the end
            listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        if let Some(limit) = options.limit {
            listings.truncate(limit as usize);
        }
        Ok(listings)
    }
}

/// Fail-open wrapper around a [`ListingStore`].
pub struct ListingFetcher<S> {
    store: S,
    options: FetchOptions,
    notifier: Arc<dyn Notifier>,
}

impl<S: ListingStore> ListingFetcher<S> {
    /// Fetcher with default options (no ordering, no limit).
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            options: FetchOptions::default(),
            notifier,
        }
    }

    /// Replace the fetch options.
    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Options sent with every fetch.
    pub fn options(&self) -> FetchOptions {
        self.options
    }

    /// Load listings once. Errors become an empty list and one notification.
    pub async fn fetch(&self) -> Vec<BookListing> {
        match self.store.fetch_active(&self.options).await {
            Ok(listings) => {
                tracing::info!(count = listings.len(), "Listings loaded");
                listings
            }
            Err(err) => {
                tracing::warn!(error = %err, "Listing fetch failed, showing no listings");
                self.notifier.notify(Notification::destructive(
                    "Error fetching books",
                    "Failed to load books. Please try again.",
                ));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use chrono::{TimeZone, Utc};

    fn dated(id: &str, day: u32) -> BookListing {
        let mut listing = BookListing::new(id, "Title", "Author");
        listing.created_at = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).single();
        listing
    }

    #[tokio::test]
    async fn test_failure_is_empty_and_notified_once() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fetcher = ListingFetcher::new(StaticStore::failing("connection refused"), notifier.clone());

        let listings = fetcher.fetch().await;

        assert!(listings.is_empty());
        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Error fetching books");
        assert!(notes[0].is_destructive());
    }

    #[tokio::test]
    async fn test_success_is_silent() {
        let notifier = Arc::new(RecordingNotifier::new());
        let fetcher = ListingFetcher::new(
            StaticStore::new(vec![dated("a", 1), dated("b", 2)]),
            notifier.clone(),
        );

        assert_eq!(fetcher.fetch().await.len(), 2);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_static_store_orders_by_recency() {
        let mut undated = BookListing::new("u", "Title", "Author");
        undated.created_at = None;
        let store = StaticStore::new(vec![dated("old", 1), undated, dated("new", 9), dated("mid", 5)]);

        let listings = store
            .fetch_active(&FetchOptions::newest_first())
            .await
            .unwrap();
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old", "u"]);

        let limited = store
            .fetch_active(&FetchOptions { order_by_recency: false, limit: Some(2) })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, "old");
    }
}

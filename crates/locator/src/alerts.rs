//! Inventory alerts: saved searches that count matching listings.

use crate::error::{LocatorError, Result};
use crate::listing::BookListing;
use crate::notify::{Notification, Notifier};
use crate::search::{text_matches, within_price};
use bookshare_core::validation::Validator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the user asks to be alerted about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDraft {
    /// Words that must all appear in title, author or course code
    pub search_query: String,
    /// Exact category
    pub category: Option<String>,
    /// Highest acceptable price
    pub max_price: Option<f64>,
    /// Substring of the pickup location
    pub location: Option<String>,
}

/// A saved alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert id
    pub id: String,
    /// Words that must all appear in title, author or course code
    pub search_query: String,
    /// Exact category
    pub category: Option<String>,
    /// Highest acceptable price
    pub max_price: Option<f64>,
    /// Substring of the pickup location
    pub location: Option<String>,
    /// Paused alerts are skipped by [`AlertBook::evaluate`]
    pub is_active: bool,
    /// Day the alert was created
    pub created_at: NaiveDate,
    /// Listings matched at the last evaluation
    pub match_count: usize,
    /// Last day a match was reported
    pub last_notified: Option<NaiveDate>,
}

impl Alert {
    /// Does `listing` satisfy this alert?
    pub fn matches(&self, listing: &BookListing) -> bool {
        let words_match = self
            .search_query
            .split_whitespace()
            .all(|word| text_matches(listing, word));
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|c| listing.category == c);
        let price_match = self.max_price.is_none_or(|cap| within_price(listing, cap));
        let location_match = self.location.as_deref().is_none_or(|place| {
            listing
                .location_label
                .to_lowercase()
                .contains(&place.to_lowercase())
        });

        words_match && category_match && price_match && location_match
    }
}

/// The user's alerts, newest first.
pub struct AlertBook {
    alerts: Vec<Alert>,
    notifier: Arc<dyn Notifier>,
}

impl AlertBook {
    /// Empty book.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            alerts: Vec::new(),
            notifier,
        }
    }

    /// Book holding previously saved alerts, kept in the given order.
    pub fn with_alerts(alerts: Vec<Alert>, notifier: Arc<dyn Notifier>) -> Self {
        Self { alerts, notifier }
    }

    /// All alerts, newest first.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Alert by id.
    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Save a new active alert at the top of the list.
    pub fn create(&mut self, draft: AlertDraft, today: NaiveDate) -> Result<&Alert> {
        let search_query = draft.search_query.trim().to_string();
        if search_query.is_empty() {
            self.notifier.notify(Notification::destructive(
                "Missing search query",
                "Please enter what book you're looking for.",
            ));
            return Err(LocatorError::Validation("search_query: is required".to_string()));
        }

        let result = Validator::new().price("max_price", draft.max_price).validate();
        if !result.is_valid() {
            return Err(LocatorError::Validation(result.summary()));
        }

        let alert = Alert {
            id: uuid::Uuid::new_v4().to_string(),
            search_query,
            category: non_blank(draft.category),
            max_price: draft.max_price,
            location: non_blank(draft.location),
            is_active: true,
            created_at: today,
            match_count: 0,
            last_notified: None,
        };
        tracing::info!(id = %alert.id, query = %alert.search_query, "Alert created");
        self.alerts.insert(0, alert);

        self.notifier.notify(Notification::info(
            "Alert created",
            "You'll be notified when a matching book becomes available.",
        ));
        Ok(&self.alerts[0])
    }

    /// Pause or resume an alert. Returns the new active flag.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| LocatorError::UnknownAlert(id.to_string()))?;

        alert.is_active = !alert.is_active;
        let notification = if alert.is_active {
            Notification::info(
                "Alert activated",
                "You'll now receive notifications for this alert.",
            )
        } else {
            Notification::info(
                "Alert paused",
                "You won't receive notifications for this alert.",
            )
        };
        let active = alert.is_active;
        self.notifier.notify(notification);
        Ok(active)
    }

    /// Remove an alert.
    pub fn delete(&mut self, id: &str) -> Result<Alert> {
        let index = self
            .alerts
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| LocatorError::UnknownAlert(id.to_string()))?;

        let removed = self.alerts.remove(index);
        self.notifier
            .notify(Notification::info("Alert deleted", "The alert has been removed."));
        Ok(removed)
    }

    /// Recount matches for every active alert.
    ///
    /// Alerts whose count grew are stamped with `today` and announced.
    /// Returns how many alerts grew.
    pub fn evaluate(&mut self, listings: &[BookListing], today: NaiveDate) -> usize {
        let mut grown = 0;
        for alert in self.alerts.iter_mut().filter(|a| a.is_active) {
            let count = listings.iter().filter(|l| alert.matches(l)).count();
            if count > alert.match_count {
                alert.last_notified = Some(today);
                grown += 1;
            }
            alert.match_count = count;
        }

        if grown > 0 {
            self.notifier.notify(Notification::info(
                "New book found!",
                "A book matching your alert is now available.",
            ));
        }
        grown
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! `bookshare search` - filter the catalog

use super::Context;
use crate::notifier::TerminalNotifier;
use anyhow::Result;
use bookshare_cli::output::{format_duration, format_count, Status};
use bookshare_cli::progress;
use bookshare_core::validation::Validator;
use bookshare_locator::fetch::{FetchOptions, ListingFetcher};
use bookshare_locator::search::{ListingQuery, CATEGORIES};
use bookshare_locator::{BookListing, Condition, ListingType, LocatorError};
use owo_colors::OwoColorize;
use bookshare_telemetry::Timer;
use std::sync::Arc;

/// Raw filter flags
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub query: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub listing_type: Option<String>,
    pub max_price: Option<f64>,
}

impl Filters {
    /// Validate the flags into a query
    pub fn into_query(self) -> Result<ListingQuery, LocatorError> {
        let mut query = ListingQuery::new();

        if let Some(text) = self.query {
            query = query.text(text);
        }

        if let Some(category) = self.category {
            let canonical = CATEGORIES
                .iter()
                .find(|c| c.eq_ignore_ascii_case(category.trim()))
                .ok_or_else(|| {
                    LocatorError::Validation(format!(
                        "unknown category '{category}', expected one of: {}",
                        CATEGORIES.join(", ")
                    ))
                })?;
            query = query.category(*canonical);
        }

        if let Some(label) = self.condition {
            let condition = Condition::parse(&label);
            if condition == Condition::Unknown {
                let names: Vec<&str> = Condition::ALL.iter().map(Condition::as_str).collect();
                return Err(LocatorError::Validation(format!(
                    "unknown condition '{label}', expected one of: {}",
                    names.join(", ")
                )));
            }
            query = query.condition(condition);
        }

        if let Some(label) = self.listing_type {
            let listing_type = ListingType::parse(&label);
            if listing_type == ListingType::Unknown {
                let names: Vec<&str> = ListingType::ALL.iter().map(ListingType::as_str).collect();
                return Err(LocatorError::Validation(format!(
                    "unknown listing type '{label}', expected one of: {}",
                    names.join(", ")
                )));
            }
            query = query.listing_type(listing_type);
        }

        let price = Validator::new().price("max_price", self.max_price).validate();
        if !price.is_valid() {
            return Err(LocatorError::Validation(price.summary()));
        }
        if let Some(cap) = self.max_price {
            query = query.max_price(cap);
        }

        Ok(query)
    }
}

/// Run the catalog search
pub async fn run(ctx: &Context, filters: Filters) -> Result<()> {
    let query = filters.into_query()?;
    let config = ctx.config()?;
    let client = super::client()?;

    let notifier = Arc::new(TerminalNotifier::new(ctx.json || !ctx.verbose));
    let options = FetchOptions {
        order_by_recency: config.schema.locator.order_by_recency,
        limit: None,
    };
    let fetcher = ListingFetcher::new(client.books(), notifier).with_options(options);

    let spinner = (!ctx.json).then(|| progress::spinner("Searching books..."));
    let timer = Timer::start("search.fetch");
    let listings = fetcher.fetch().await;
    let elapsed = timer.stop();
    if let Some(pb) = &spinner {
        progress::finish_clear(pb);
    }

    let matches = query.apply(&listings);

    if ctx.json {
        return super::print_json(&matches);
    }

    Status::header("Search results");
    if matches.is_empty() {
        Status::info("No books match your search.");
        return Ok(());
    }

    for listing in &matches {
        print_listing(listing);
    }

    println!();
    Status::success(&format!(
        "{} of {} ({})",
        format_count(matches.len(), "match", "matches"),
        format_count(listings.len(), "listing", "listings"),
        format_duration(elapsed)
    ));
    Ok(())
}

fn print_listing(listing: &BookListing) {
    let course = listing
        .course_code
        .as_deref()
        .map(|code| format!(" [{code}]"))
        .unwrap_or_default();
    println!(
        "  {}{}  {}  {}  {}",
        listing.title.bold(),
        course.dimmed(),
        format!("by {}", listing.author).dimmed(),
        listing.condition,
        listing.price_label().green()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_is_canonicalised() {
        let filters = Filters {
            category: Some("natural sciences".into()),
            ..Filters::default()
        };
        let query = filters.into_query().unwrap();
        assert_eq!(query.category.as_deref(), Some("Natural Sciences"));
    }

    #[test]
    fn test_unknown_labels_rejected() {
        let bad_condition = Filters {
            condition: Some("mint".into()),
            ..Filters::default()
        };
        assert!(matches!(bad_condition.into_query(), Err(LocatorError::Validation(_))));

        let bad_type = Filters {
            listing_type: Some("rent".into()),
            ..Filters::default()
        };
        assert!(bad_type.into_query().is_err());

        let bad_price = Filters {
            max_price: Some(-1.0),
            ..Filters::default()
        };
        assert!(bad_price.into_query().is_err());
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let filters = Filters {
            query: Some("   ".into()),
            ..Filters::default()
        };
        assert!(filters.into_query().unwrap().is_empty());
    }
}

//! `bookshare nearby` - books within a radius of a position

use super::Context;
use crate::notifier::TerminalNotifier;
use anyhow::Result;
use bookshare_cli::output::{format_duration, format_coordinate, format_count, format_distance, Status};
use bookshare_cli::progress;
use bookshare_locator::filter::NearbyListing;
use bookshare_locator::location::LocationSource;
use bookshare_locator::placement::PlacementSource;
use bookshare_locator::{ProximityLocator, SearchRadius};
use owo_colors::OwoColorize;
use serde::Serialize;
use bookshare_telemetry::Timer;
use std::sync::Arc;

/// One result line in JSON output
#[derive(Debug, Serialize)]
struct NearbyRow<'a> {
    id: &'a str,
    title: &'a str,
    author: &'a str,
    distance_km: f64,
    price: String,
    condition: &'static str,
    listing_type: &'static str,
    location: &'a str,
    latitude: f64,
    longitude: f64,
    placement: PlacementSource,
}

impl<'a> From<&'a NearbyListing> for NearbyRow<'a> {
    fn from(hit: &'a NearbyListing) -> Self {
        let listing = &hit.placed.listing;
        Self {
            id: &listing.id,
            title: &listing.title,
            author: &listing.author,
            distance_km: hit.distance_km,
            price: listing.price_label(),
            condition: listing.condition.as_str(),
            listing_type: listing.listing_type.as_str(),
            location: &listing.location_label,
            latitude: hit.placed.coordinate.latitude,
            longitude: hit.placed.coordinate.longitude,
            placement: hit.placed.source,
        }
    }
}

/// Run the nearby search
pub async fn run(
    ctx: &Context,
    position: Option<(f64, f64)>,
    radius: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    let config = ctx.config()?;
    let explicit = radius.map(SearchRadius::new).transpose()?;
    let store = ctx.session()?;
    let radius = super::search_radius(explicit, &store.get(), &config);
    let provider = super::provider(position)?;
    let client = super::client()?;

    let notifier = Arc::new(TerminalNotifier::new(ctx.json || !ctx.verbose));
    let mut locator = ProximityLocator::from_config(&config.schema, provider, client.books(), notifier)
        .with_radius(radius);

    let spinner = (!ctx.json).then(|| progress::spinner("Loading books near you..."));
    let timer = Timer::start("nearby.refresh");
    let outcome = locator.refresh().await;
    let elapsed = timer.stop();
    if let Some(pb) = &spinner {
        progress::finish_clear(pb);
    }
    outcome?;
    super::remember_radius(&store, explicit);

    let shown: Vec<&NearbyListing> = locator
        .nearby()
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if ctx.json {
        let rows: Vec<NearbyRow<'_>> = shown.into_iter().map(NearbyRow::from).collect();
        return super::print_json(&rows);
    }

    let Some(location) = locator.location() else {
        return Ok(());
    };
    let from = format_coordinate(location.coordinate.latitude, location.coordinate.longitude);
    let origin = match location.source {
        LocationSource::Device => from,
        LocationSource::Fallback => format!("{from} (default location)"),
    };
    Status::header(&format!("Books within {} of {}", locator.radius(), origin));

    if shown.is_empty() {
        Status::info("No books listed in this area yet. Try a larger radius.");
        return Ok(());
    }

    for hit in &shown {
        let listing = &hit.placed.listing;
        println!(
            "  {:>8}  {} {}  {}",
            format_distance(hit.distance_km).dimmed(),
            listing.title.bold(),
            format!("by {}", listing.author).dimmed(),
            listing.price_label().green()
        );
    }

    println!();
    Status::success(&format!(
        "{} of {} nearby ({})",
        format_count(shown.len(), "book", "books"),
        locator.nearby().len(),
        format_duration(elapsed)
    ));
    Ok(())
}

//! `bookshare distance` - great-circle distance between two positions

use super::Context;
use anyhow::Result;
use bookshare_cli::output::{format_coordinate, format_distance};
use bookshare_geo::Coordinate;
use bookshare_locator::filter::distance;
use bookshare_locator::LocatorError;
use serde_json::json;

/// Print the distance between two positions
pub fn run(ctx: &Context, from: (f64, f64), to: (f64, f64)) -> Result<()> {
    let a = checked(from)?;
    let b = checked(to)?;
    let km = distance(&a, &b);

    if ctx.json {
        return super::print_json(&json!({
            "from": a,
            "to": b,
            "distance_km": km,
        }));
    }

    println!(
        "{} → {}: {} ({:.2} km)",
        format_coordinate(a.latitude, a.longitude),
        format_coordinate(b.latitude, b.longitude),
        format_distance(km),
        km
    );
    Ok(())
}

fn checked((lat, lng): (f64, f64)) -> Result<Coordinate> {
    Ok(Coordinate::checked(lat, lng).map_err(LocatorError::from)?)
}

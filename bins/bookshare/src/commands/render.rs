//! `bookshare render` - emit a map backend's scene document

use super::Context;
use crate::notifier::TerminalNotifier;
use anyhow::{bail, Result};
use bookshare_core::config::MapBackendKind;
use bookshare_core::session::MapCredential;
use bookshare_locator::surface::SurfaceState;
use bookshare_locator::{LocatorError, ProximityLocator, SearchRadius};
use std::sync::Arc;

/// Render the map for a position and print the backend document as JSON
pub async fn run(
    ctx: &Context,
    position: Option<(f64, f64)>,
    radius: Option<f64>,
    backend: Option<&str>,
    token: Option<String>,
) -> Result<()> {
    bookshare_telemetry::timed_span!("render");
    let mut config = ctx.config()?;
    if let Some(name) = backend {
        config.schema.map.backend = name
            .parse::<MapBackendKind>()
            .map_err(LocatorError::Validation)?;
    }
    let explicit = radius.map(SearchRadius::new).transpose()?;
    let store = ctx.session()?;
    if let Some(token) = token {
        store.update(|s| s.map_credential = Some(MapCredential::new(token)));
    }
    let session = store.get();
    let radius = super::search_radius(explicit, &session, &config);
    let provider = super::provider(position)?;
    let client = super::client()?;

    let notifier = Arc::new(TerminalNotifier::new(!ctx.verbose));
    let mut locator = ProximityLocator::from_config(&config.schema, provider, client.books(), notifier)
        .with_radius(radius);

    locator.use_session(&session)?;
    locator.refresh().await?;
    super::remember_radius(&store, explicit);

    if locator.surface().state() == SurfaceState::AwaitingCredentials {
        bail!(
            "the {} backend needs a credential, pass --token or set BOOKSHARE_MAP_TOKEN",
            config.schema.map.backend
        );
    }

    let document = locator.render()?;
    tracing::debug!(
        backend = %config.schema.map.backend,
        markers = locator.nearby().len(),
        "Map document rendered"
    );
    super::print_json(&document)?;
    locator.dispose();
    Ok(())
}

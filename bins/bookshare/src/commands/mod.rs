//! Subcommand implementations

pub mod distance;
pub mod nearby;
pub mod render;
pub mod search;
pub mod session;

use anyhow::{Context as _, Result};
use bookshare_api_client::{ApiError, BookshareClient};
use bookshare_core::config::Config;
use bookshare_core::error::exit_codes;
use bookshare_core::session::{Session, SessionStore};
use bookshare_geo::Coordinate;
use bookshare_locator::location::StaticProvider;
use bookshare_locator::{LocatorError, LocatorErrorCode, SearchRadius};
use serde::Serialize;
use std::path::PathBuf;

/// Options shared by every subcommand
#[derive(Debug, Clone)]
pub struct Context {
    pub config_path: Option<String>,
    pub session_path: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
}

impl Context {
    /// Load and validate configuration
    pub fn config(&self) -> Result<Config> {
        Ok(Config::load(self.config_path.as_deref())?)
    }

    /// Open the session file, `--session` or the one in the user config directory
    pub fn session(&self) -> Result<SessionStore> {
        let store = match &self.session_path {
            Some(path) => SessionStore::open(path)?,
            None => SessionStore::open_default()?,
        };
        Ok(store)
    }
}

/// Radius for a search: the flag, then the session's last radius, then config
pub fn search_radius(explicit: Option<SearchRadius>, session: &Session, config: &Config) -> SearchRadius {
    explicit.unwrap_or_else(|| {
        SearchRadius::clamped(session.radius_km.unwrap_or(config.schema.locator.default_radius_km))
    })
}

/// Keep an explicitly chosen radius for the next search
pub fn remember_radius(store: &SessionStore, explicit: Option<SearchRadius>) {
    let Some(radius) = explicit else {
        return;
    };
    store.update(|s| s.remember_radius(radius.km()));
    if let Err(e) = store.save() {
        tracing::warn!(path = %store.path().display(), error = %e, "Could not save session");
    }
}

/// Provider answering with the given position, or failing so the fallback is used
pub fn provider(position: Option<(f64, f64)>) -> Result<StaticProvider> {
    let coordinate = position
        .map(|(lat, lng)| Coordinate::checked(lat, lng))
        .transpose()
        .map_err(LocatorError::from)?;
    Ok(StaticProvider::from_option(coordinate))
}

/// Backend client from the environment
pub fn client() -> Result<BookshareClient> {
    BookshareClient::new().context("Could not configure the BookShare backend client")
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Exit code for an error returned by a subcommand
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<LocatorError>() {
            return match e.code() {
                LocatorErrorCode::InvalidRadius | LocatorErrorCode::Validation => exit_codes::VALIDATION_ERROR,
                _ => exit_codes::FAILURE,
            };
        }
        if let Some(e) = cause.downcast_ref::<ApiError>() {
            return if e.is_configuration() {
                exit_codes::CONFIG_ERROR
            } else {
                exit_codes::FAILURE
            };
        }
        if let Some(e) = cause.downcast_ref::<bookshare_core::Error>() {
            return e.code.exit_code();
        }
    }
    exit_codes::FAILURE
}

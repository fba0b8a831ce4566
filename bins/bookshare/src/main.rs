//! BookShare CLI - find textbooks listed near you
//!
//! Fetches active listings from the backend, filters them by distance from a
//! position and prints them, or emits the map document a backend would draw.

use bookshare_cli::output::Status;
use bookshare_core::config::Config;
use bookshare_core::error::exit_codes;
use bookshare_telemetry::TelemetryConfig;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod notifier;

/// Find textbooks listed near you
#[derive(Parser)]
#[command(name = "bookshare")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a configuration file
    #[arg(short, long, global = true, env = "BOOKSHARE_CONFIG")]
    config: Option<String>,

    /// Path to the session file
    #[arg(long, global = true, env = "BOOKSHARE_SESSION")]
    session: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where to search from. Without both values the configured fallback is used.
#[derive(clap::Args, Debug, Clone, Copy)]
struct PositionArgs {
    /// Latitude of your position
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude of your position
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List books within a radius of a position
    Nearby {
        #[command(flatten)]
        position: PositionArgs,

        /// Search radius in kilometres (1-50)
        #[arg(short, long)]
        radius: Option<f64>,

        /// Show at most this many results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Great-circle distance between two positions
    Distance {
        /// Latitude of the first position
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        /// Longitude of the first position
        #[arg(allow_negative_numbers = true)]
        lng1: f64,
        /// Latitude of the second position
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        /// Longitude of the second position
        #[arg(allow_negative_numbers = true)]
        lng2: f64,
    },

    /// Search the catalog
    Search {
        /// Text matched against title, author and course code
        query: Option<String>,

        /// Exact category
        #[arg(long)]
        category: Option<String>,

        /// Condition (new, like-new, good, fair, poor)
        #[arg(long)]
        condition: Option<String>,

        /// Listing type (sell, exchange, free)
        #[arg(long = "type")]
        listing_type: Option<String>,

        /// Highest acceptable price
        #[arg(long)]
        max_price: Option<f64>,
    },

    /// Emit the document a map backend would draw
    Render {
        #[command(flatten)]
        position: PositionArgs,

        /// Search radius in kilometres (1-50)
        #[arg(short, long)]
        radius: Option<f64>,

        /// Map backend (mapbox, google, leaflet, placeholder)
        #[arg(short, long)]
        backend: Option<String>,

        /// Map token or API key for backends that need one
        #[arg(short, long, env = "BOOKSHARE_MAP_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Show or change the stored session
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Log level comes from the config file; a broken file is reported by the command itself
    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        Config::load(cli.config.as_deref())
            .map(|config| TelemetryConfig::with_level(config.schema.logging.level))
            .unwrap_or_else(|_| TelemetryConfig::with_level("warn"))
    };
    if let Err(e) = bookshare_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let ctx = commands::Context {
        config_path: cli.config,
        session_path: cli.session,
        json: cli.json,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Nearby { position, radius, limit } => {
            commands::nearby::run(&ctx, position.lat.zip(position.lng), radius, limit).await
        }

        Commands::Distance { lat1, lng1, lat2, lng2 } => {
            commands::distance::run(&ctx, (lat1, lng1), (lat2, lng2))
        }

        Commands::Search { query, category, condition, listing_type, max_price } => {
            let filters = commands::search::Filters {
                query,
                category,
                condition,
                listing_type,
                max_price,
            };
            commands::search::run(&ctx, filters).await
        }

        Commands::Render { position, radius, backend, token } => {
            commands::render::run(
                &ctx,
                position.lat.zip(position.lng),
                radius,
                backend.as_deref(),
                token,
            )
            .await
        }

        Commands::Session { action } => commands::session::run(&ctx, action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            let code = commands::exit_code_for(&e);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_lat_requires_lng() {
        let parsed = Cli::try_parse_from(["bookshare", "nearby", "--lat", "40.7"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_negative_coordinates_parse() {
        let cli = Cli::try_parse_from(["bookshare", "distance", "40.7", "-74.0", "-33.9", "151.2"]).unwrap();
        match cli.command {
            Commands::Distance { lng1, lat2, .. } => {
                assert_eq!(lng1, -74.0);
                assert_eq!(lat2, -33.9);
            }
            _ => panic!("expected distance"),
        }
    }

    #[test]
    fn test_exit_codes_fit_in_u8() {
        for code in [
            exit_codes::SUCCESS,
            exit_codes::FAILURE,
            exit_codes::VALIDATION_ERROR,
            exit_codes::CONFIG_ERROR,
            exit_codes::NO_RESULTS,
        ] {
            assert!(u8::try_from(code).is_ok());
        }
    }
}

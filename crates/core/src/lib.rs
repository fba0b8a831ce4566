//! Core utilities for BookShare
//!
//! This crate provides shared functionality used by the locator, the API
//! client and the CLI:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Validation**: Fluent validator for configuration and user input
//! - **Session**: Explicit session context with load/save boundaries
//!
//! # Example
//!
//! ```rust,no_run
//! use bookshare_core::config::Config;
//! use bookshare_core::session::SessionStore;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("Search radius: {} km", config.schema.locator.default_radius_km);
//!
//! let store = SessionStore::open_default().expect("session storage unavailable");
//! if !store.get().is_signed_in() {
//!     println!("Browsing anonymously");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod session;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, MapBackendKind, PlacementMode};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::session::{MapCredential, Session, SessionStore};
    pub use crate::validation::{ValidationResult, Validator};
}

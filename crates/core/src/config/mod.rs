//! Configuration loading and schema definitions
//!
//! Settings shared by the locator, the map surface and the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;

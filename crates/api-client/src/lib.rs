//! Read-only client for the BookShare listings backend
//!
//! Listings live in a hosted Supabase project. This crate talks to its
//! PostgREST interface to read the `books` collection; it never writes.
//!
//! # Features
//!
//! - **Environment-based configuration**: Load the project URL and anon key from environment variables
//! - **Request correlation**: Every request carries a unique `X-Request-ID`
//! - **Typed rows**: `books` rows deserialize into [`endpoints::books::BookRow`]
//!
//! Requests are made exactly once. Callers decide what a failure means; the
//! locator treats it as "no listings".
//!
//! # Example
//!
//! ```rust,no_run
//! use bookshare_api_client::{BookshareClient, endpoints::books::ListBooksParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BookshareClient::new()?;
//!
//!     let books = client.books().list_active(&ListBooksParams::newest_first()).await?;
//!     println!("{} active listings", books.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::BookshareClient;
pub use config::{ClientConfig, Environment};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::BookshareClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::books::{BookRow, BooksApi, ListBooksParams};
    pub use crate::error::{ApiError, ApiResult};
}

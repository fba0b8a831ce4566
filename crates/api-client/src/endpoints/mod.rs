//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one PostgREST collection.
//!
//! | Module | Collection | Description |
//! |--------|-----------|-------------|
//! | `books` | `books` | Active textbook listings (read-only) |

pub mod books;

pub use books::BooksApi;

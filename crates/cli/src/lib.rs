//! Terminal output helpers for BookShare tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Distance, duration and count formatting
//! - A spinner for backend round trips

#![warn(missing_docs)]

pub mod output;
pub mod progress;

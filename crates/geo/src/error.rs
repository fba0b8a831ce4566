//! Errors from coordinate checks and PostGIS point parsing.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Why a position could not be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A PostGIS text point that is not `POINT(lng lat)`
    #[error("Invalid WKT point: {0}")]
    InvalidWkt(String),

    /// Latitude or longitude outside WGS84 bounds
    #[error("Invalid coordinate ({latitude}, {longitude}): must be within [-90, 90] x [-180, 180]")]
    InvalidCoordinate {
        /// Rejected latitude
        latitude: f64,
        /// Rejected longitude
        longitude: f64,
    },
}

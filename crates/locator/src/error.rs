//! Error types for the locator crate.

use thiserror::Error;

/// Result type alias for locator operations.
pub type Result<T> = std::result::Result<T, LocatorError>;

/// Errors surfaced by the locator and the map surface.
///
/// Location and fetch failures are normally absorbed (fallback coordinate,
/// empty listing set) and reported through notifications; the variants exist
/// so providers and stores have something typed to return.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Device position could not be obtained
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Listings could not be loaded from the backend
    #[error("Failed to fetch listings: {0}")]
    FetchFailure(String),

    /// The map backend refused to start
    #[error("Map initialization failed: {0}")]
    MapInitFailure(String),

    /// Radius outside the supported range
    #[error("Invalid search radius {value} km: must be between {min} and {max} km")]
    InvalidRadius {
        /// Requested radius
        value: f64,
        /// Smallest accepted radius
        min: f64,
        /// Largest accepted radius
        max: f64,
    },

    /// The map surface has been torn down
    #[error("Map surface has been disposed")]
    SurfaceDisposed,

    /// No listing with that id on the map
    #[error("Unknown listing: {0}")]
    UnknownListing(String),

    /// No saved alert with that id
    #[error("Unknown alert: {0}")]
    UnknownAlert(String),

    /// User input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Error code for integration with bookshare-core error handling.
/// Range: 20xxx for locator errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorErrorCode {
    /// Device position unavailable
    LocationUnavailable = 20001,
    /// Backend fetch failed
    FetchFailure = 20002,
    /// Map backend could not start
    MapInitFailure = 20003,
    /// Radius out of range
    InvalidRadius = 20004,
    /// Surface already disposed
    SurfaceDisposed = 20005,
    /// Unknown listing id
    UnknownListing = 20006,
    /// Input validation failure
    Validation = 20007,
    /// Unknown alert id
    UnknownAlert = 20008,
}

impl LocatorError {
    /// Returns the error code for this error.
    pub fn code(&self) -> LocatorErrorCode {
        match self {
            LocatorError::LocationUnavailable(_) => LocatorErrorCode::LocationUnavailable,
            LocatorError::FetchFailure(_) => LocatorErrorCode::FetchFailure,
            LocatorError::MapInitFailure(_) => LocatorErrorCode::MapInitFailure,
            LocatorError::InvalidRadius { .. } => LocatorErrorCode::InvalidRadius,
            LocatorError::SurfaceDisposed => LocatorErrorCode::SurfaceDisposed,
            LocatorError::UnknownListing(_) => LocatorErrorCode::UnknownListing,
            LocatorError::UnknownAlert(_) => LocatorErrorCode::UnknownAlert,
            LocatorError::Validation(_) => LocatorErrorCode::Validation,
        }
    }
}

impl From<bookshare_api_client::ApiError> for LocatorError {
    fn from(err: bookshare_api_client::ApiError) -> Self {
        LocatorError::FetchFailure(err.to_string())
    }
}

impl From<bookshare_geo::GeoError> for LocatorError {
    fn from(err: bookshare_geo::GeoError) -> Self {
        LocatorError::Validation(err.to_string())
    }
}

impl From<bookshare_core::Error> for LocatorError {
    fn from(err: bookshare_core::Error) -> Self {
        LocatorError::Validation(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_in_locator_range() {
        let errors = [
            LocatorError::LocationUnavailable("denied".into()),
            LocatorError::FetchFailure("timeout".into()),
            LocatorError::MapInitFailure("bad token".into()),
            LocatorError::InvalidRadius { value: 0.0, min: 1.0, max: 50.0 },
            LocatorError::SurfaceDisposed,
            LocatorError::UnknownListing("b1".into()),
            LocatorError::UnknownAlert("a1".into()),
            LocatorError::Validation("empty".into()),
        ];
        for err in &errors {
            let code = err.code() as u32;
            assert!((20001..20100).contains(&code), "{err} has code {code}");
        }
    }

    #[test]
    fn test_unknown_alert_is_not_a_listing() {
        let err = LocatorError::UnknownAlert("a1".into());
        assert_eq!(err.code(), LocatorErrorCode::UnknownAlert);
        assert_eq!(err.to_string(), "Unknown alert: a1");
    }

    #[test]
    fn test_bad_coordinate_is_validation() {
        let err = LocatorError::from(bookshare_geo::Coordinate::checked(95.0, 0.0).unwrap_err());
        assert!(matches!(err, LocatorError::Validation(ref m) if m.contains("(95, 0)")));
    }

    #[test]
    fn test_radius_message() {
        let err = LocatorError::InvalidRadius { value: 75.0, min: 1.0, max: 50.0 };
        assert_eq!(
            err.to_string(),
            "Invalid search radius 75 km: must be between 1 and 50 km"
        );
    }
}

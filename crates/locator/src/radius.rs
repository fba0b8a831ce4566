//! Search radius in kilometres.

use crate::error::{LocatorError, Result};
use bookshare_core::config::{MAX_RADIUS_KM, MIN_RADIUS_KM};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Radius of the proximity search, always within [1, 50] km.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SearchRadius(f64);

impl SearchRadius {
    /// Smallest radius.
    pub const MIN_KM: f64 = MIN_RADIUS_KM;
    /// Largest radius.
    pub const MAX_KM: f64 = MAX_RADIUS_KM;
    /// Radius used when nothing else is configured.
    pub const DEFAULT_KM: f64 = 5.0;

    /// Radius in kilometres, rejecting values outside the range.
    pub fn new(km: f64) -> Result<Self> {
        if (Self::MIN_KM..=Self::MAX_KM).contains(&km) {
            Ok(Self(km))
        } else {
            Err(LocatorError::InvalidRadius {
                value: km,
                min: Self::MIN_KM,
                max: Self::MAX_KM,
            })
        }
    }

    /// Radius saturated into the range. NaN becomes the default.
    pub fn clamped(km: f64) -> Self {
        if km.is_nan() {
            Self::default()
        } else {
            Self(km.clamp(Self::MIN_KM, Self::MAX_KM))
        }
    }

    /// Kilometres.
    pub fn km(self) -> f64 {
        self.0
    }

    /// Metres.
    pub fn meters(self) -> f64 {
        self.0 * 1000.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self(Self::DEFAULT_KM)
    }
}

impl TryFrom<f64> for SearchRadius {
    type Error = LocatorError;

    fn try_from(km: f64) -> Result<Self> {
        Self::new(km)
    }
}

impl From<SearchRadius> for f64 {
    fn from(radius: SearchRadius) -> Self {
        radius.0
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(SearchRadius::new(1.0).is_ok());
        assert!(SearchRadius::new(50.0).is_ok());
        assert!(matches!(
            SearchRadius::new(0.5),
            Err(LocatorError::InvalidRadius { .. })
        ));
        assert!(SearchRadius::new(50.1).is_err());
        assert!(SearchRadius::new(f64::NAN).is_err());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(SearchRadius::clamped(0.0).km(), 1.0);
        assert_eq!(SearchRadius::clamped(80.0).km(), 50.0);
        assert_eq!(SearchRadius::clamped(12.5).km(), 12.5);
        assert_eq!(SearchRadius::clamped(f64::NAN), SearchRadius::default());
    }

    #[test]
    fn test_default_and_display() {
        let radius = SearchRadius::default();
        assert_eq!(radius.km(), 5.0);
        assert_eq!(radius.meters(), 5000.0);
        assert_eq!(radius.to_string(), "5 km");
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<SearchRadius>("10.0").is_ok());
        assert!(serde_json::from_str::<SearchRadius>("100.0").is_err());
    }
}

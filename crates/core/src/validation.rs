//! Checks for configuration values and user input
//!
//! A [`Validator`] collects every problem with a set of values instead of
//! stopping at the first, so a config file or an alert form reports all of
//! its issues at once. Besides the generic checks it knows the marketplace's
//! own rules: WGS84 coordinates, the search radius bounds and prices.
//!
//! # Example
//!
//! ```
//! use bookshare_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("search_query", "Calculus Stewart")
//!     .price("max_price", Some(80.0))
//!     .radius_km("radius", 5.0)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::config::{MAX_RADIUS_KM, MIN_RADIUS_KM};
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One failed check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed
    pub field: String,
    /// What is wrong
    pub message: String,
    /// Machine-readable check name, e.g. `RANGE`
    pub code: String,
    /// What would have passed
    pub expected: Option<String>,
    /// What was given
    pub actual: Option<String>,
}

impl ValidationError {
    fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            code: code.to_string(),
            expected: None,
            actual: None,
        }
    }

    fn expected(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a [`Validator`] run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// True when every check passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failed checks, in the order they ran
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Every failure on one line, `field: message; field: message`
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Ok` when valid, otherwise a [`crate::ErrorCode::ValidationError`]
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::validation(format!("Validation failed: {}", self.summary())))
        }
    }
}

/// Fluent validator builder
#[derive(Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Validator with no checks yet
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(mut self, error: ValidationError) -> Self {
        self.result.errors.push(error);
        self
    }

    /// Value must contain something other than whitespace
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.fail(ValidationError::new(field, "REQUIRED", "Field is required"))
        } else {
            self
        }
    }

    /// Value must match `pattern`; `description` is shown on failure
    pub fn pattern(self, field: &str, value: &str, pattern: &str, description: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(value) => self,
            Ok(_) => self.fail(
                ValidationError::new(field, "PATTERN", format!("Must match {description}"))
                    .expected(description, value),
            ),
            Err(_) => self.fail(ValidationError::new(field, "INTERNAL", "Invalid validation pattern")),
        }
    }

    /// Value must be one of `allowed`
    pub fn one_of(self, field: &str, value: &str, allowed: &[&str]) -> Self {
        if allowed.contains(&value) {
            return self;
        }
        let choices = allowed.join(", ");
        self.fail(
            ValidationError::new(field, "ONE_OF", format!("Must be one of: {choices}"))
                .expected(choices, value),
        )
    }

    /// Value must lie in `min..=max`. NaN never does.
    pub fn range<T: PartialOrd + std::fmt::Display>(self, field: &str, value: T, min: T, max: T) -> Self {
        if value >= min && value <= max {
            return self;
        }
        self.fail(
            ValidationError::new(field, "RANGE", format!("Must be between {min} and {max}"))
                .expected(format!("{min} - {max}"), value.to_string()),
        )
    }

    /// A search radius the locator accepts
    pub fn radius_km(self, field: &str, km: f64) -> Self {
        if (MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&km) {
            return self;
        }
        self.fail(
            ValidationError::new(
                field,
                "RADIUS",
                format!("Search radius must be between {MIN_RADIUS_KM} and {MAX_RADIUS_KM} km"),
            )
            .expected(format!("{MIN_RADIUS_KM} - {MAX_RADIUS_KM} km"), format!("{km} km")),
        )
    }

    /// A latitude/longitude pair inside WGS84 bounds
    pub fn coordinate(self, field: &str, latitude: f64, longitude: f64) -> Self {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            return self;
        }
        self.fail(
            ValidationError::new(field, "COORDINATE", "Must be a WGS84 coordinate")
                .expected("latitude -90..90, longitude -180..180", format!("{latitude}, {longitude}")),
        )
    }

    /// An optional price: absent, or a finite amount of zero or more
    pub fn price(self, field: &str, price: Option<f64>) -> Self {
        match price {
            Some(p) if !p.is_finite() || p < 0.0 => self.fail(
                ValidationError::new(field, "PRICE", format!("Must be zero or more, got {p}"))
                    .expected(">= 0", p.to_string()),
            ),
            _ => self,
        }
    }

    /// Check computed by the caller; `Some(message)` fails
    pub fn custom<F>(self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        match f() {
            Some(message) => self.fail(ValidationError::new(field, "CUSTOM", message)),
            None => self,
        }
    }

    /// Finish and return every failure
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

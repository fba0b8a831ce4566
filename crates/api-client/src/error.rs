//! Errors from talking to the BookShare backend

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Why a backend call failed
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never got a response
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the expected JSON rows
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Client settings are unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required `SUPABASE_*` variable is not set
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// PostgREST answered with a non-2xx status
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Body of the error response
        message: String,
    },

    /// Project URL and path do not form a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// True when the fix is in the environment or settings, not the request
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingEnvVar(_) | Self::InvalidUrl(_))
    }

    /// True for 5xx answers
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(!ApiError::api_response(404, "missing").is_server_error());
        assert!(ApiError::api_response(503, "down").is_server_error());
    }

    #[test]
    fn test_configuration_errors() {
        assert!(ApiError::missing_env("SUPABASE_URL").is_configuration());
        assert!(ApiError::config("timeout: cannot be zero").is_configuration());
        assert!(ApiError::InvalidUrl("nope".into()).is_configuration());
        assert!(!ApiError::api_response(500, "boom").is_configuration());
    }
}

//! Configuration for the BookShare API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use bookshare_core::validation::Validator;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Local Supabase started by `supabase start`
const LOCAL_SUPABASE_URL: &str = "http://localhost:54321";

/// PostgREST mount point below the project URL
const REST_PATH: &str = "/rest/v1";

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (typically localhost Supabase)
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse a free-form environment name, defaulting to production
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Default request timeout for this environment
    #[must_use]
    pub fn default_timeout(self) -> Duration {
        match self {
            Self::Development => Duration::from_secs(10),
            Self::Staging | Self::Production => Duration::from_secs(30),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Supabase project URL, e.g. `https://xyz.supabase.co`
    pub project_url: String,
    /// Supabase anonymous key, sent as `apikey` and as the default bearer token
    pub anon_key: Option<String>,
    /// Signed-in user's access token, preferred over the anon key for `Authorization`
    #[serde(skip)]
    pub access_token: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `SUPABASE_URL`: Project URL (required)
    /// - `SUPABASE_ANON_KEY`: Anonymous key
    /// - `BOOKSHARE_ENV`: Environment (development/staging/production)
    /// - `BOOKSHARE_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::parse(&lookup("BOOKSHARE_ENV").unwrap_or_default());

        let project_url = lookup("SUPABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::missing_env("SUPABASE_URL"))?;

        let timeout = lookup("BOOKSHARE_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map_or_else(|| environment.default_timeout(), Duration::from_secs);

        Ok(Self {
            project_url: project_url.trim().trim_end_matches('/').to_string(),
            anon_key: lookup("SUPABASE_ANON_KEY").filter(|k| !k.is_empty()),
            access_token: None,
            timeout,
            environment,
        })
    }

    /// Create development configuration (local Supabase)
    #[must_use]
    pub fn development() -> Self {
        Self {
            project_url: LOCAL_SUPABASE_URL.to_string(),
            anon_key: None,
            access_token: None,
            timeout: Environment::Development.default_timeout(),
            environment: Environment::Development,
        }
    }

    /// PostgREST base URL derived from the project URL
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}{REST_PATH}", self.project_url.trim_end_matches('/'))
    }

    /// Builder-style method to set the project URL
    #[must_use]
    pub fn with_project_url(mut self, url: impl Into<String>) -> Self {
        self.project_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder-style method to set anon key
    #[must_use]
    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    /// Builder-style method to set the user's access token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Token sent in the `Authorization` header, if any
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.access_token.as_deref().or(self.anon_key.as_deref())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        let url = self.project_url.as_str();
        let result = Validator::new()
            .required("project_url", url)
            .pattern("project_url", url, r"^(https?://\S+)?$", "an http:// or https:// URL")
            .custom("timeout", || {
                self.timeout.is_zero().then(|| "cannot be zero".to_string())
            })
            .validate();

        if result.is_valid() {
            Ok(())
        } else {
            Err(ApiError::config(result.summary()))
        }
    }
}

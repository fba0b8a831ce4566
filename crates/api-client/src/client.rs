//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::BooksApi;
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// API key header for Supabase
const APIKEY_HEADER: &str = "apikey";

/// BookShare PostgREST client
///
/// Thin wrapper over `reqwest` that adds the Supabase auth headers and a
/// correlation id per request. Each call is attempted once.
#[derive(Clone)]
pub struct BookshareClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl BookshareClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("bookshare-api-client/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(ref key) = config.anon_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| ApiError::config("anon key contains invalid header characters"))?;
            default_headers.insert(APIKEY_HEADER, value);
        }

        if let Some(token) = config.bearer_token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::config("bearer token contains invalid header characters"))?;
            default_headers.insert(AUTHORIZATION, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the PostgREST base URL
    #[must_use]
    pub fn rest_url(&self) -> String {
        self.config.rest_url()
    }

    /// Access the `books` collection
    #[must_use]
    pub fn books(&self) -> BooksApi {
        BooksApi::new(self.clone())
    }

    /// Perform a GET request against a PostgREST path with query pairs
    #[instrument(skip(self, query), fields(request_id))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let (value, elapsed) = self.timed_get(path, query).await?;
        debug!(path = %path, elapsed_ms = elapsed.as_millis(), "Request succeeded");
        Ok(value)
    }

    /// GET that also reports how long the round trip took
    pub async fn timed_get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<(T, Duration)> {
        let url = self.url_for(path)?;
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let response = self
            .inner
            .request(Method::GET, url)
            .query(query)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await
            .inspect_err(|e| {
                warn!(request_id = %request_id, error = %e, "Request could not be sent");
            })?;

        let value = handle_response(&request_id, response).await?;
        Ok((value, start.elapsed()))
    }

    fn url_for(&self, path: &str) -> ApiResult<reqwest::Url> {
        let raw = format!("{}/{}", self.config.rest_url(), path.trim_start_matches('/'));
        reqwest::Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }
}

/// Handle HTTP response and deserialize
async fn handle_response<T: DeserializeOwned>(request_id: &str, response: Response) -> ApiResult<T> {
    let status = response.status();

    if status.is_success() {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(ApiError::Json)
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let err = ApiError::api_response(status.as_u16(), message);
        warn!(
            request_id = %request_id,
            status = status.as_u16(),
            server_error = err.is_server_error(),
            "Request rejected"
        );
        Err(err)
    }
}

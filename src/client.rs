//! HTTP client for the SerpApi search endpoint

use crate::query::SearchParams;
use crate::response::FlightsResponse;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search";

/// Outcome of a failed request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The endpoint answered with a non-success status
    #[error("Request failed: {status} - {body}")]
    Http { status: u16, body: String },

    /// Anything else: DNS, connection, timeout, undecodable body
    #[error("Unexpected error: {0}")]
    Transport(String),

    #[error("Invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Issues one GET per search against the configured endpoint
#[derive(Debug, Clone)]
pub struct SerpApiClient {
    http_client: Client,
    endpoint: Url,
}

impl SerpApiClient {
    /// Client for the public SerpApi endpoint
    pub fn new() -> Result<Self, ApiError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client for a custom endpoint, e.g. a proxy or a local stub
    pub fn with_endpoint(endpoint: &str) -> Result<Self, ApiError> {
        let endpoint = Url::parse(endpoint).map_err(|e| ApiError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        debug!(endpoint = %endpoint, "Creating SerpApi client");
        let http_client = Client::builder()
            .user_agent(concat!("serp-flights/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Perform the search request. No retries.
    #[instrument(level = "info", skip(self, params))]
    pub async fn fetch(&self, params: &SearchParams) -> Result<FlightsResponse, ApiError> {
        info!(url = %params.redacted_url(&self.endpoint), "Making HTTP request to SerpApi");

        let start_time = std::time::Instant::now();
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .query(params.pairs())
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request could not be completed");
                ApiError::from(e)
            })?;
        let status = response.status();
        let body = response.text().await?;

        info!(
            status = %status,
            duration_ms = start_time.elapsed().as_millis(),
            body_length = body.len(),
            "HTTP request completed"
        );

        decode_response(status, body)
    }
}

/// Classify a received response: non-2xx is `Http`, an undecodable body is `Transport`.
pub fn decode_response(status: StatusCode, body: String) -> Result<FlightsResponse, ApiError> {
    if !status.is_success() {
        error!(status = %status, "SerpApi returned an error status");
        return Err(ApiError::Http {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        error!(error = %e, "Failed to decode SerpApi response");
        ApiError::Transport(format!("malformed response: {}", e))
    })
}

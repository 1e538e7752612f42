//! HTTP client for the customer-fit scoring API.
//!
//! Wraps `reqwest` with basic-auth credential handling and typed response
//! deserialization. One call per lookup key; nothing here retries, caches, or
//! runs concurrently.

use std::time::Duration;

use bulkscore_core::{LookupKey, ScoreMode};
use reqwest::{Client, Url};

use crate::error::ScoringError;
use crate::types::{CustomerFit, ScoreResponse};

const DEFAULT_BASE_URL: &str = "https://api.madkudu.com/v1/";

/// Client for the scoring REST API.
///
/// Use [`ScoringClient::new`] for production or
/// [`ScoringClient::with_base_url`] to point at a mock server in tests.
pub struct ScoringClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for ScoringClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ScoringClient {
    /// Creates a new client pointed at the production scoring API.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: Option<u64>,
        user_agent: &str,
    ) -> Result<Self, ScoringError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// `timeout_secs = None` leaves requests without a client-side deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScoringError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: Option<u64>,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ScoringError> {
        let mut builder = Client::builder().user_agent(user_agent.to_owned());
        if let Some(secs) = timeout_secs {
            builder = builder
                .timeout(Duration::from_secs(secs))
                .connect_timeout(Duration::from_secs(secs.min(10)));
        }
        let client = builder.build()?;

        // Exactly one trailing slash, so endpoint paths join under the base
        // rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScoringError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches the customer fit for one domain or email.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::Http`] on network failure or non-2xx HTTP status.
    /// - [`ScoringError::Deserialize`] if the body lacks
    ///   `properties.customer_fit` or its required fields.
    pub async fn score(
        &self,
        mode: ScoreMode,
        key: &LookupKey,
    ) -> Result<CustomerFit, ScoringError> {
        let url = self.build_url(mode, key)?;
        tracing::debug!(%mode, key = %key, "requesting customer fit");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let parsed: ScoreResponse =
            serde_json::from_str(&body).map_err(|e| ScoringError::Deserialize {
                context: format!("{}({}={key})", mode.endpoint(), mode.param()),
                source: e,
            })?;

        Ok(parsed.properties.customer_fit)
    }

    /// Builds the endpoint URL with the key as a percent-encoded query pair.
    fn build_url(&self, mode: ScoreMode, key: &LookupKey) -> Result<Url, ScoringError> {
        let mut url =
            self.base_url
                .join(mode.endpoint())
                .map_err(|e| ScoringError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut().append_pair(mode.param(), key.as_str());
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use thiserror::Error;

/// Errors returned by the scoring API client.
///
/// Every variant is fatal for a bulk run; there is no retry layer.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not JSON or lacks the customer-fit fields.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

//! Error types for the tracker integration.

use tt_store::StoreError;

/// Error from tracker API operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum JiraError {
    /// Malformed or missing certificate/consumer credentials. Not
    /// retryable; an operator has to fix the configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote returned 401. Carries a freshly minted authorization URL
    /// the end user must visit; never retried automatically.
    #[error("authorization required, visit {authorize_url}")]
    Unauthorized {
        /// Tracker authorize URL with the new request token appended.
        authorize_url: String,
    },

    /// Remote returned 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    Transport(#[from] ureq::Error),

    /// HTTP response error (server returned an unexpected status).
    #[error("HTTP error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Failure during the request/access token exchange.
    #[error("OAuth handshake failed: {message}")]
    Handshake {
        /// HTTP status code, when the failure was an HTTP error.
        status: Option<u16>,
        /// Underlying message.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("response decode error")]
    Decode(#[from] serde_json::Error),

    /// Credential/entry store failure.
    #[error("store error")]
    Store(#[from] StoreError),
}

impl JiraError {
    /// Shorthand for a handshake failure without an HTTP status.
    pub(crate) fn handshake(message: impl Into<String>) -> Self {
        Self::Handshake {
            status: None,
            message: message.into(),
        }
    }
}

//! Error types
//!
//! Discovery and metric requests fail in one of two ways: the caller sent
//! something we cannot act on ([`Error`] validation variants), or the provider
//! call itself failed ([`TransportError`]). Neither is retried.

use thiserror::Error;

/// Failure of a single provider invocation, including decoding its response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to UCloud API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("UCloud API returned HTTP {status}")]
    Status { status: u16 },

    #[error("[{action}] RetCode {code}: {message}")]
    Api {
        action: String,
        code: i64,
        message: String,
    },

    #[error("failed to decode {action} response: {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {action} request: {source}")]
    Encode {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    pub fn decode(action: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            action: action.to_string(),
            source,
        }
    }
}

/// Error returned to the caller of a discovery or metric request.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing parameter Action")]
    MissingAction,

    #[error("got invalid Action {0}")]
    UnknownAction(String),

    #[error("must set ResourceType")]
    MissingResourceType,

    #[error("got invalid ResourceType {0}")]
    UnknownResourceType(String),

    #[error("invalid query: {0}")]
    InvalidQuery(#[source] serde_json::Error),

    #[error("metric query task failed: {0}")]
    QueryTask(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    pub fn not_an_integer(field: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: "not an integer".to_string(),
        }
    }

    /// True for caller mistakes, false when the provider call failed.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Transport(_) | Self::QueryTask(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

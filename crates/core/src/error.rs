//! Error taxonomy for pawmatch.
//!
//! | Kind | Variants | Reaches network |
//! |------|----------|-----------------|
//! | Validation | `Validation` | No |
//! | Transport | `Http`, `Network`, `Timeout`, `Malformed` | Yes |
//! | Auth | `Unauthorized` | Yes |
//! | No match | `NoMatch` | Yes |
//!
//! `Unauthorized` is the one class the core never absorbs: it always propagates
//! so the surrounding shell can send the user back through login.

use thiserror::Error;

/// Result type for pawmatch operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// 401/403 from any endpoint.
    #[error("not authorized (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Any other non-2xx response.
    #[error("HTTP error ({status}): {body}")]
    Http { status: u16, body: String },

    /// Connection, DNS or body-read failure.
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// Response body did not match the endpoint's schema.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The match endpoint answered successfully but without a match id.
    #[error("no match found")]
    NoMatch,

    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification used by front ends to pick a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailure,
    TransportFailure,
    AuthFailure,
    NoMatchFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::Config(_) => ErrorKind::ValidationFailure,
            Error::Unauthorized { .. } => ErrorKind::AuthFailure,
            Error::NoMatch => ErrorKind::NoMatchFailure,
            Error::Http { .. } | Error::Network(_) | Error::Timeout | Error::Malformed(_) => {
                ErrorKind::TransportFailure
            }
        }
    }

    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => Error::Unauthorized { status },
            _ => Error::Http { status, body: body.into() },
        }
    }

    #[inline]
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// Transient failures worth offering a retry for.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout | Error::Network(_) | Error::NoMatch => true,
            Error::Http { status, .. } => matches!(status, 408 | 425 | 429 | 502 | 503 | 504),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Malformed(err.to_string())
    }
}

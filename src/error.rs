use crate::http::RateLimitInfo;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the transport and the catalog operations built on it.
///
/// A 404 is never an error: lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Server answered 429; carries the parsed quota so callers can wait until `reset`.
    #[error("rate limit exceeded ({} of {} remaining, resets at {})", .0.remaining, .0.total, .0.reset)]
    RateLimited(RateLimitInfo),

    /// Server answered 429 without usable rate-limit headers.
    #[error("rate limit exceeded and rate-limit headers could not be parsed")]
    RateLimitUnparsable,

    #[error("request cancelled")]
    Cancelled,

    #[error("timeout requesting {url}")]
    Timeout { url: String },

    /// Connection-level failure (DNS, refused connection, TLS, broken body stream).
    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Buffered body was not valid JSON or did not match the requested shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid or mismatched steam id: {steam_id}")]
    InvalidIdentity { steam_id: String },

    #[error("invalid auth ticket")]
    InvalidCredential,

    #[error("vote rejected (HTTP {status}, code {code}): {identifier}")]
    VoteRejected {
        status: StatusCode,
        code: i64,
        identifier: String,
    },

    #[error("HTTP {status} requesting {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    /// Caller-supplied key, hash or id that cannot be used as a path segment.
    #[error("invalid path segment {0:?}")]
    InvalidPathSegment(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
            }
        } else {
            Error::Network {
                url: url.to_string(),
                source,
            }
        }
    }

    /// True for failures a caller may reasonably retry later.
    pub fn is_retriable(&self) -> bool {
        match self {
            Error::RateLimited(_)
            | Error::RateLimitUnparsable
            | Error::Timeout { .. }
            | Error::Network { .. } => true,
            Error::UnexpectedStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

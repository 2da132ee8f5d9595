//! Error types shared by score feed implementations.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`FeedError`] failures.
pub type FeedResult<T> = Result<T, FeedError>;

/// Failures that can occur while reading the score feed.
///
/// During monitoring every variant is treated as "no snapshot this poll".
#[derive(Debug, Error)]
pub enum FeedError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build feed HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent or timed out.
    #[error("failed to send feed request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The feed returned an unexpected status code.
    #[error("unexpected feed response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// The response body was not the expected JSON.
    #[error("failed to decode feed response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// A schedule row carried an unparsable start time.
    #[error("invalid start time `{value}` for game {game_id}")]
    InvalidStartTime {
        game_id: u64,
        value: String,
        #[source]
        source: time::error::Parse,
    },
}

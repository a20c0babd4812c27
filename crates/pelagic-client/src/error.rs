//! Error types for the habitat API client.

/// Errors that can occur when calling the habitat API.
///
/// There is exactly one failure class end-to-end -- "collaborator call
/// failed" -- split here only by where it was detected so call sites can
/// log something useful. No variant is retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect, DNS, timeout).
    #[error("request to {endpoint} failed: {source}")]
    Request {
        /// The endpoint path that was called.
        endpoint: &'static str,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        /// The endpoint path that was called.
        endpoint: &'static str,
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body, best effort.
        body: String,
    },

    /// The response body did not decode into the expected shape.
    #[error("{endpoint} response decode failed: {source}")]
    Decode {
        /// The endpoint path that was called.
        endpoint: &'static str,
        /// The underlying decode error.
        source: reqwest::Error,
    },

    /// The client could not be constructed.
    #[error("client build failed: {source}")]
    Build {
        /// The underlying builder error.
        source: reqwest::Error,
    },
}

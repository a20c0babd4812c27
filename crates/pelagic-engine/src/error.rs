//! Error types for the habitat server binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup.

/// Top-level error for the habitat server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {message}")]
    Config {
        /// Description of the configuration failure.
        message: String,
    },

    /// Cascade configuration was rejected.
    #[error("cascade error: {source}")]
    Cascade {
        /// The underlying cascade config error.
        #[from]
        source: pelagic_cascade::CascadeConfigError,
    },

    /// The HTTP server failed to start.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: pelagic_api::ServerError,
    },
}

//! Error types for the session runtime.

use demolink_protocol::ShareCodeError;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the session runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport unreachable after the single reconnect attempt.
    #[error("connection error: {0}")]
    Connection(String),

    /// Malformed share-code. Surfaced immediately, never retried.
    #[error("invalid share code: {0}")]
    InvalidShareCode(#[from] ShareCodeError),

    /// The bounded wait for a coordinator response elapsed.
    ///
    /// Internal signal consumed by the requester's retry loop; it never
    /// crosses the public `get_match_url` boundary.
    #[error("game coordinator timed out")]
    GcTimeout,

    /// An underlying client call reported failure.
    #[error("client error: {0}")]
    Client(String),
}

impl Error {
    /// Returns true if this is the internal coordinator-timeout signal.
    pub fn is_gc_timeout(&self) -> bool {
        matches!(self, Error::GcTimeout)
    }
}

//! Error types for the task stream client.

use shared_types::{KeyError, TransportError};
use thiserror::Error;

/// Task stream errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The key manager could not list the validating keys.
    #[error("failed to fetch validating public keys: {0}")]
    FetchKeys(#[from] KeyError),

    /// No keys to subscribe with; opening a stream would receive nothing.
    #[error("no validating public keys available")]
    NoPublicKeys,

    /// The coordinator rejected or failed the stream request.
    #[error("failed to open task stream: {0}")]
    Open(TransportError),

    /// A non-EOF receive error terminated the stream.
    #[error("task stream receive failed: {0}")]
    Receive(TransportError),
}

impl StreamError {
    /// Errors after which a new stream may be attempted.
    pub fn is_reconnectable(&self) -> bool {
        matches!(self, StreamError::Open(_) | StreamError::Receive(_))
    }
}

/// Result type for task stream operations
pub type Result<T> = std::result::Result<T, StreamError>;

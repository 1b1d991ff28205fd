//! Error types for the slot clock.

use shared_types::TransportError;
use thiserror::Error;

/// Slot clock errors
#[derive(Debug, Error)]
pub enum ClockError {
    /// The chain-start stream ended before delivering a genesis time.
    #[error("chain-start stream closed before genesis time was received")]
    ChainStartClosed,

    /// The caller cancelled while waiting for chain start.
    #[error("cancelled while waiting for chain start")]
    Cancelled,

    /// The chain-start stream could not be opened or failed mid-way.
    #[error("chain-start transport error: {0}")]
    Transport(#[from] TransportError),

    /// Slot queries require a started clock.
    #[error("slot clock not started")]
    NotStarted,
}

impl ClockError {
    /// True for caller-initiated cancellation, as opposed to a protocol failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ClockError::Cancelled)
    }
}

/// Result type for slot clock operations
pub type Result<T> = std::result::Result<T, ClockError>;

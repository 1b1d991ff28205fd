//! Error types for the duty dispatcher, resolver, router and role tasks.

use shared_types::{KeyError, Role, ScopeExit, StreamTopic, TransportError};
use sv_01_slot_clock::ClockError;
use sv_03_partial_signer::SignerError;
use thiserror::Error;

/// Errors that halt the dispatcher.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// The slot clock could not start or was queried before starting.
    #[error("slot clock failure: {0}")]
    Clock(#[from] ClockError),
}

/// Duty resolution failure. Skips one slot iteration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("failed to fetch validating keys: {0}")]
    Keys(#[from] KeyError),

    #[error("duties request failed: {0}")]
    Transport(#[from] TransportError),
}

/// Task router unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The router stopped; no further tasks will be delivered.
    #[error("task router closed")]
    Closed,
}

/// Failure of a single role task. Never affects sibling tasks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("waiting for task: {0}")]
    Router(#[from] RouterError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    /// A task arrived under the right topic with the wrong payload kind.
    #[error("task for topic {topic} carried an unexpected payload")]
    UnexpectedPayload { topic: StreamTopic },

    /// Roles the dispatcher never spawns work for.
    #[error("role {0} has no executor")]
    NoExecutor(Role),

    /// Role recognized but not implemented; no work was done.
    #[error("role {0} not supported")]
    Unsupported(Role),

    #[error("aborted: {0}")]
    Aborted(#[from] ScopeExit),
}

impl RoleError {
    /// True when the slot scope ended the task rather than a failure.
    pub fn is_abort(&self) -> bool {
        match self {
            RoleError::Aborted(_) => true,
            RoleError::Signer(e) => e.is_abort(),
            _ => false,
        }
    }

    /// True when the role was passed over without running.
    pub fn is_skip(&self) -> bool {
        matches!(self, RoleError::Unsupported(_))
    }
}

/// Result type for dispatcher operations
pub type Result<T> = std::result::Result<T, DispatcherError>;

//! Error types for the partial signer.

use shared_types::{BlsPubKey, KeyError, ScopeExit, TransportError, ValidatorIndex};
use thiserror::Error;

/// Partial signing errors. All are per-task: they abort one signing task and
/// never its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The validator is not a member of the committee returned for the epoch.
    #[error("validator {validator_index} not found in committee {committee:?}")]
    PositionNotFound {
        validator_index: ValidatorIndex,
        committee: Vec<ValidatorIndex>,
    },

    /// The duties response holds no duty for the signing key.
    #[error("no duty returned for {0}")]
    DutyNotFound(BlsPubKey),

    #[error("duties lookup failed: {0}")]
    Duties(TransportError),

    #[error("signature domain lookup failed: {0}")]
    Domain(TransportError),

    #[error("signing failed: {0}")]
    Signing(#[from] KeyError),

    #[error("submission failed: {0}")]
    Submission(TransportError),

    #[error("invalid aggregation bitfield: {0}")]
    Bitfield(String),

    #[error("failed to encode signing object: {0}")]
    Encoding(String),

    /// The slot deadline passed before the task finished.
    #[error("slot deadline exceeded")]
    DeadlineExceeded,

    #[error("cancelled")]
    Cancelled,
}

impl SignerError {
    /// True when the task was aborted by its scope rather than failing.
    pub fn is_abort(&self) -> bool {
        matches!(self, SignerError::DeadlineExceeded | SignerError::Cancelled)
    }
}

impl From<ScopeExit> for SignerError {
    fn from(exit: ScopeExit) -> Self {
        match exit {
            ScopeExit::Deadline => SignerError::DeadlineExceeded,
            ScopeExit::Shutdown => SignerError::Cancelled,
        }
    }
}

/// Result type for partial signing operations
pub type Result<T> = std::result::Result<T, SignerError>;

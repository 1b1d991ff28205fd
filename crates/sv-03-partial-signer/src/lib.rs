//! # Partial Signer (sv-03)
//!
//! Produces one SSV participant's contribution for a signing task.
//!
//! - [`PartialSigner::sign_partial_attestation`]: looks up the signer's duty
//!   for the epoch, locates its own position in the committee, signs and
//!   submits an attestation whose aggregation bitfield has exactly that one
//!   bit set. A validator missing from the committee is
//!   [`SignerError::PositionNotFound`] and nothing is submitted.
//! - [`PartialSigner::sign_partial_block`]: signs the block for
//!   `epoch = slot / slots_per_epoch` and submits it.
//!
//! Submission failures are returned, never retried.

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{committee_position, AggregationBits};
pub use error::{Result, SignerError};
pub use service::PartialSigner;

//! Domain layer: pure committee, bitfield and signing-root logic.

pub mod bitfield;
pub mod committee;
pub mod signing;

pub use bitfield::AggregationBits;
pub use committee::committee_position;
pub use signing::{attestation_signing_root, block_signing_root};

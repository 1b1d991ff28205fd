//! # Beacon Message Shapes
//!
//! Logical shapes of the beacon objects a validator signs and submits.
//! Wire encoding is left to the transport.

use crate::primitives::{CommitteeIndex, Epoch, Root, Signature, Slot, ValidatorIndex};
use serde::{Deserialize, Serialize};

/// Signature domain type (4 bytes).
pub type DomainType = [u8; 4];

/// Domain for signing beacon block proposals.
pub const DOMAIN_BEACON_PROPOSER: DomainType = [0, 0, 0, 0];

/// Domain for signing attestations.
pub const DOMAIN_BEACON_ATTESTER: DomainType = [1, 0, 0, 0];

/// An epoch boundary checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Root,
}

/// The data a committee member votes on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttestationData {
    pub slot: Slot,
    pub committee_index: CommitteeIndex,
    pub beacon_block_root: Root,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

/// Block body fields relevant to the proposer signature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeaconBlockBody {
    pub randao_reveal: Vec<u8>,
    pub graffiti: [u8; 32],
}

/// An unsigned beacon block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeaconBlock {
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Root,
    pub state_root: Root,
    pub body: BeaconBlockBody,
}

/// An attestation carrying an aggregation bitlist (SSZ encoded).
///
/// A partial attestation has exactly one bit set: the signer's own position
/// in the committee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub data: AttestationData,
    pub aggregation_bits: Vec<u8>,
    pub signature: Signature,
}

/// A beacon block with the proposer's (partial) signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBeaconBlock {
    pub block: BeaconBlock,
    pub signature: Signature,
}

//! # SSV Task Types
//!
//! Signing tasks pushed by the coordinating node down the task stream.

use crate::beacon::{AttestationData, BeaconBlock};
use crate::primitives::{BlsPubKey, Slot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Topics a validator can subscribe to on the task stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamTopic {
    SignBlock,
    CheckBlock,
    SignAttestation,
    CheckAttestation,
    SignAggregation,
}

impl StreamTopic {
    /// The fixed subscription list sent with every stream request.
    pub const ALL: [StreamTopic; 5] = [
        StreamTopic::SignBlock,
        StreamTopic::CheckBlock,
        StreamTopic::SignAttestation,
        StreamTopic::CheckAttestation,
        StreamTopic::SignAggregation,
    ];

    /// Metric/log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamTopic::SignBlock => "sign_block",
            StreamTopic::CheckBlock => "check_block",
            StreamTopic::SignAttestation => "sign_attestation",
            StreamTopic::CheckAttestation => "check_attestation",
            StreamTopic::SignAggregation => "sign_aggregation",
        }
    }
}

impl fmt::Display for StreamTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task-specific payload: exactly one of attestation data or a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPayload {
    Attestation(AttestationData),
    Block(BeaconBlock),
}

/// A single-use signing task addressed to one public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsvTask {
    pub public_key: BlsPubKey,
    pub topic: StreamTopic,
    pub payload: TaskPayload,
}

impl SsvTask {
    /// Slot the payload belongs to.
    pub fn slot(&self) -> Slot {
        match &self.payload {
            TaskPayload::Attestation(data) => data.slot,
            TaskPayload::Block(block) => block.slot,
        }
    }
}

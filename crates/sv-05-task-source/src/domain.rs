//! Synthetic task construction.

use shared_types::{
    AttestationData, BlsPubKey, Checkpoint, Slot, SsvTask, StreamTopic, TaskPayload,
};

/// Committee index carried by every synthetic attestation task.
pub const SYNTHETIC_COMMITTEE_INDEX: u64 = 1;
pub const SYNTHETIC_SOURCE_EPOCH: u64 = 2;
pub const SYNTHETIC_TARGET_EPOCH: u64 = 3;

/// `sign_attestation` task for `slot` with fixed checkpoints and zero roots.
pub fn synthetic_attestation_task(public_key: BlsPubKey, slot: Slot) -> SsvTask {
    SsvTask {
        public_key,
        topic: StreamTopic::SignAttestation,
        payload: TaskPayload::Attestation(AttestationData {
            slot,
            committee_index: SYNTHETIC_COMMITTEE_INDEX,
            beacon_block_root: [0u8; 32],
            source: Checkpoint {
                epoch: SYNTHETIC_SOURCE_EPOCH,
                root: [0u8; 32],
            },
            target: Checkpoint {
                epoch: SYNTHETIC_TARGET_EPOCH,
                root: [0u8; 32],
            },
        }),
    }
}

//! Development wiring: an in-process task source serving interop keys.

use crate::config::ValidatorConfig;
use shared_types::rpc::DutyAssignment;
use shared_types::{BlsPubKey, Shutdown};
use std::sync::Arc;
use sv_01_slot_clock::WallClock;
use sv_05_task_source::{TaskSource, TaskSourceConfig};

/// One committee holding every interop key; key `i` attests at offset
/// `i % slots_per_epoch` in every epoch.
pub fn interop_duties(
    public_keys: &[BlsPubKey],
    start_index: u64,
    slots_per_epoch: u64,
) -> Vec<DutyAssignment> {
    let committee: Vec<u64> = (start_index..start_index + public_keys.len() as u64).collect();
    public_keys
        .iter()
        .zip(committee.iter().copied())
        .enumerate()
        .map(|(offset, (public_key, validator_index))| DutyAssignment {
            public_key: *public_key,
            validator_index,
            committee_index: 1,
            committee: committee.clone(),
            attester_slot: offset as u64 % slots_per_epoch,
            proposer_slots: Vec::new(),
            aggregator: false,
        })
        .collect()
}

/// Task source announcing `config.dev.genesis_time`, or the current wall
/// time when unset.
pub fn in_process_source(
    config: &ValidatorConfig,
    public_keys: &[BlsPubKey],
    wall: Arc<dyn WallClock>,
    shutdown: Shutdown,
) -> TaskSource {
    let genesis_time = config.dev.genesis_time.unwrap_or_else(|| wall.now().as_secs());
    let mut source_config = TaskSourceConfig::new(genesis_time)
        .with_duties(interop_duties(
            public_keys,
            config.dev.interop_start_index,
            config.chain.slots_per_epoch,
        ))
        .repeating_every_epoch();
    source_config.chain = config.chain;
    TaskSource::new(source_config, wall, shutdown)
}

//! Shared wiring for the integration flows.

use shared_types::rpc::DutyAssignment;
use shared_types::{BlsPubKey, Shutdown, ValidatorIndex};
use std::sync::Arc;
use std::time::Duration;
use sv_01_slot_clock::FixedWallClock;
use sv_05_task_source::{TaskSource, TaskSourceConfig};
use validator_runtime::LocalKeyManager;

/// Genesis used by every flow.
pub const T0: u64 = 1_600_000_000;

/// One second into slot 0, so the first tick is slot 1 eleven seconds later.
pub fn wall_clock() -> Arc<FixedWallClock> {
    Arc::new(FixedWallClock(Duration::from_secs(T0 + 1)))
}

/// Interop keys 0 and 1.
pub fn keys() -> Arc<LocalKeyManager> {
    Arc::new(LocalKeyManager::interop(0, 2).expect("interop keys"))
}

pub fn attester_duty(
    public_key: BlsPubKey,
    validator_index: ValidatorIndex,
    committee: Vec<ValidatorIndex>,
    attester_slot: u64,
) -> DutyAssignment {
    DutyAssignment {
        public_key,
        validator_index,
        committee_index: 1,
        committee,
        attester_slot,
        proposer_slots: Vec::new(),
        aggregator: false,
    }
}

pub fn task_source(duties: Vec<DutyAssignment>, shutdown: Shutdown) -> Arc<TaskSource> {
    Arc::new(TaskSource::new(
        TaskSourceConfig::new(T0).with_duties(duties),
        wall_clock(),
        shutdown,
    ))
}

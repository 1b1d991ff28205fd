//! Role derivation from epoch-scoped duty assignments.

use shared_types::rpc::DutyAssignment;
use shared_types::{Role, Slot, ValidatorDuty};

/// Roles `assignment` plays in `slot`; `[Role::None]` when it has none.
pub fn roles_for_slot(assignment: &DutyAssignment, slot: Slot) -> Vec<Role> {
    let mut roles = Vec::new();
    if assignment.attester_slot == slot {
        roles.push(Role::Attester);
        if assignment.aggregator {
            roles.push(Role::Aggregator);
        }
    }
    if assignment.proposer_slots.contains(&slot) {
        roles.push(Role::Proposer);
    }
    if roles.is_empty() {
        roles.push(Role::None);
    }
    roles
}

pub fn to_validator_duty(assignment: &DutyAssignment, slot: Slot) -> ValidatorDuty {
    ValidatorDuty {
        public_key: assignment.public_key,
        validator_index: assignment.validator_index,
        slot,
        committee_index: assignment.committee_index,
        committee: assignment.committee.clone(),
        roles: roles_for_slot(assignment, slot),
    }
}

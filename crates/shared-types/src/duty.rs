//! # Duties and Roles

use crate::primitives::{BlsPubKey, CommitteeIndex, Slot, ValidatorIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a validator plays in a slot.
///
/// A resolver that meets a role value it does not know reports it as
/// `Unrecognized` so the dispatcher can log and skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    None,
    Attester,
    Proposer,
    Aggregator,
    Unrecognized(i32),
}

impl Role {
    /// Metric/log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Attester => "attester",
            Role::Proposer => "proposer",
            Role::Aggregator => "aggregator",
            Role::Unrecognized(_) => "unrecognized",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Unrecognized(value) => write!(f, "unrecognized({value})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// One validator's assignment for one slot.
///
/// Produced once per slot by the duty resolver and discarded when the slot
/// closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDuty {
    pub public_key: BlsPubKey,
    pub validator_index: ValidatorIndex,
    pub slot: Slot,
    pub committee_index: CommitteeIndex,
    /// Committee members in committee order.
    pub committee: Vec<ValidatorIndex>,
    pub roles: Vec<Role>,
}

impl ValidatorDuty {
    /// True when at least one role requires work.
    pub fn has_work(&self) -> bool {
        self.roles.iter().any(|role| *role != Role::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_work() {
        let mut duty = ValidatorDuty {
            public_key: BlsPubKey::new([0u8; 48]),
            validator_index: 3,
            slot: 1,
            committee_index: 0,
            committee: vec![7, 3, 9, 1],
            roles: vec![Role::None],
        };
        assert!(!duty.has_work());

        duty.roles.push(Role::Attester);
        assert!(duty.has_work());
    }
}

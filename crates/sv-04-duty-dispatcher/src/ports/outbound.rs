//! Driven ports of the duty dispatcher.

use crate::error::{ResolveError, RoleError};
use async_trait::async_trait;
use shared_types::{Role, Slot, SlotScope, ValidatorDuty};

/// Source of the per-slot duty set.
///
/// Called once per slot iteration, after the clock has started.
#[async_trait]
pub trait DutyResolver: Send + Sync {
    /// Every locally held validator with its roles for `slot`. Validators
    /// without work carry [`Role::None`].
    async fn resolve_duties(&self, slot: Slot) -> Result<Vec<ValidatorDuty>, ResolveError>;
}

/// Performs the work of one role for one validator within a slot.
///
/// Implementations must observe `scope` at every suspension point and
/// return once it ends.
#[async_trait]
pub trait RoleExecutor: Send + Sync {
    async fn execute(
        &self,
        duty: &ValidatorDuty,
        role: Role,
        scope: SlotScope,
    ) -> Result<(), RoleError>;
}

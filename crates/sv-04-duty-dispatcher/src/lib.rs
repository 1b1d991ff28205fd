//! # Duty Dispatcher (sv-04)
//!
//! Drives validator participation slot by slot.
//!
//! ## Per-slot iteration
//!
//! 1. Wait for the next slot from the [`sv_01_slot_clock::SlotTicker`].
//! 2. Resolve duties once through the [`DutyResolver`]. A failure skips the
//!    slot and the loop continues.
//! 3. Spawn one task per (validator, role) pair. `Role::None` spawns nothing;
//!    unrecognized roles are logged and skipped.
//! 4. Every task runs under the slot's [`shared_types::SlotScope`], which
//!    ends at the start of the following slot or on shutdown.
//! 5. A supervisor waits for the tasks and emits a [`SlotReport`]. The
//!    dispatcher never waits for it before moving on.
//!
//! ## Task routing
//!
//! The [`TaskRouter`] owns the single SSV task stream and hands each task to
//! the role task that claims it by `(public key, topic, slot)`. Tasks that
//! arrive before their claimant are parked until the slot falls out of the
//! retention window.
//!
//! ## Architecture Layers
//!
//! ```text
//! domain/    role derivation, dispatcher state, slot report
//! ports/     DutyResolver, RoleExecutor
//! adapters/  BeaconDutyResolver, SsvRoleExecutor
//! router     TaskRouter actor and its RouterHandle
//! service    DutyDispatcher
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod router;
pub mod service;

pub use adapters::{BeaconDutyResolver, SsvRoleExecutor};
pub use domain::{roles_for_slot, to_validator_duty, DispatcherState, SlotReport};
pub use error::{DispatcherError, ResolveError, Result, RoleError, RouterError};
pub use ports::{DutyResolver, RoleExecutor};
pub use router::{ClaimKey, RouterConfig, RouterHandle, TaskRouter, DEFAULT_COMMAND_BUFFER};
pub use service::DutyDispatcher;

//! Domain layer: role derivation and dispatcher state.

mod roles;
mod state;

pub use roles::{roles_for_slot, to_validator_duty};
pub use state::{DispatcherState, SlotReport};

//! Adapters for the slot clock ports.

mod chain_start;
mod wall_clock;

pub use chain_start::BeaconChainStart;
pub use wall_clock::{FixedWallClock, SystemWallClock};

//! # Slot Clock (sv-01)
//!
//! Converts the genesis time and the fixed slot duration into a strictly
//! increasing sequence of slot numbers and per-slot deadlines.
//!
//! ## Lifecycle
//!
//! 1. [`SlotClock::start`] reads the chain-start stream until it delivers the
//!    genesis time. A stream that ends first is fatal
//!    ([`ClockError::ChainStartClosed`]); cancellation is reported as
//!    [`ClockError::Cancelled`].
//! 2. [`SlotClock::ticker`] hands out a [`SlotTicker`]; awaiting
//!    [`SlotTicker::next_slot`] is the only way to advance.
//! 3. [`SlotClock::slot_deadline`] gives the instant the next slot begins,
//!    the deadline for all work of the given slot.
//!
//! ## Architecture Layers
//!
//! ```text
//! domain/    slot arithmetic, anchored timeline (pure)
//! ports/     ChainStartSource, WallClock
//! adapters/  BeaconChainStart, SystemWallClock, FixedWallClock
//! service    SlotClock, SlotTicker
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{BeaconChainStart, FixedWallClock, SystemWallClock};
pub use error::{ClockError, Result};
pub use ports::{ChainStartSource, WallClock};
pub use service::{SlotClock, SlotTicker};

//! # Shared Types Crate
//!
//! Types shared by every crate of the SSV validator client.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: beacon message shapes, SSV tasks and duties
//!   are defined once here and consumed read-only elsewhere.
//! - **Explicit Connection**: the RPC surface (`rpc`) is a set of traits; the
//!   composition root hands concrete implementations to each component.
//!   There is no process-wide connection handle.
//! - **Scoped Work**: every unit of slot work runs inside a [`SlotScope`]
//!   bounded by the slot deadline and the root [`Shutdown`] signal.

pub mod beacon;
pub mod duty;
pub mod errors;
pub mod keys;
pub mod lifecycle;
pub mod primitives;
pub mod rpc;
pub mod ssv;

pub use beacon::*;
pub use duty::*;
pub use errors::*;
pub use keys::*;
pub use lifecycle::*;
pub use primitives::*;
pub use ssv::*;

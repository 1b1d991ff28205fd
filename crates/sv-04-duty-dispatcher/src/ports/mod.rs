//! Ports (hexagonal architecture interfaces).

pub mod outbound;

pub use outbound::{DutyResolver, RoleExecutor};

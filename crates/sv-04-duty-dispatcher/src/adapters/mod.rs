//! Adapters for the dispatcher ports.

mod beacon_resolver;
mod ssv_executor;

pub use beacon_resolver::BeaconDutyResolver;
pub use ssv_executor::SsvRoleExecutor;

//! # Task Source (sv-05)
//!
//! Reference server side of the SSV protocol, used to exercise the client
//! against a controlled task cadence. Not part of the production signing
//! path.
//!
//! [`TaskSource`] implements both RPC services:
//!
//! - [`shared_types::rpc::SsvTaskService`]: every open stream receives one
//!   `sign_attestation` task per local slot tick, addressed to the first
//!   requested key. The stream ends when the source's shutdown fires.
//! - [`shared_types::rpc::BeaconNodeValidator`]: chain start with the
//!   configured genesis time, configured duty assignments, zero signature
//!   domains, and submissions that are acknowledged and recorded.

pub mod config;
pub mod domain;
pub mod service;

pub use config::TaskSourceConfig;
pub use domain::synthetic_attestation_task;
pub use service::TaskSource;

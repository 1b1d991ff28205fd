//! # Validator Runtime
//!
//! Composition root of the SSV validator client. The `ssv-validator` binary
//! is a thin wrapper around this library.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment and validate it
//! 2. Initialize telemetry
//! 3. Build the connection handle and the key manager
//! 4. Spawn the task router and the duty dispatcher
//! 5. Wait for ctrl-c or a fatal dispatcher stop, then shut down
//!
//! ## Modules
//!
//! - `config` - environment-driven configuration
//! - `connection` - explicit handle to the coordinating node
//! - `adapters/` - local key manager
//! - `runtime` - component wiring and lifecycle
//! - `dev` - in-process task source over interop keys

pub mod adapters;
pub mod config;
pub mod connection;
pub mod dev;
pub mod runtime;

pub use adapters::LocalKeyManager;
pub use config::{ConfigError, DevConfig, StreamConfig, ValidatorConfig};
pub use connection::BeaconConnection;
pub use runtime::{RunningValidator, RuntimeError, ValidatorRuntime};

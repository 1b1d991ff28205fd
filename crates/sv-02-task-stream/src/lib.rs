//! # Task Stream Client (sv-02)
//!
//! Opens the long-lived SSV task stream for every locally held validator key
//! and the fixed topic subscription, then runs a single background pump that
//! forwards tasks to one consumer.
//!
//! ## Flow Control
//!
//! The output channel holds one task ([`TASK_CHANNEL_CAPACITY`]). While the
//! consumer is busy the pump does not receive from the network.
//!
//! ## Termination
//!
//! End-of-stream and shutdown surface as [`TaskEvent::Closed`]; a receive
//! error surfaces as [`TaskEvent::Error`] and is kept for
//! [`TaskReceiver::last_error`]. Neither is retried here.

pub mod domain;
pub mod error;
pub mod service;

pub use domain::TaskEvent;
pub use error::{Result, StreamError};
pub use service::{TaskReceiver, TaskStreamClient, TASK_CHANNEL_CAPACITY};

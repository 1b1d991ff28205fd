//! # Error Types
//!
//! Errors shared across the RPC and key-management boundaries.

use crate::primitives::BlsPubKey;
use thiserror::Error;

/// Errors returned by the transport to the beacon/coordinating node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint could not be reached.
    #[error("Endpoint unavailable: {0}")]
    Unavailable(String),

    /// The remote side answered with a non-OK status.
    #[error("RPC failed with status {code}: {message}")]
    Status { code: i32, message: String },

    /// The request was rejected before it was sent or by the server.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors from the key-management capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// No key material for this public key.
    #[error("Unknown validating key {0}")]
    UnknownKey(BlsPubKey),

    /// Backend failure (remote signer, keystore).
    #[error("Key manager error: {0}")]
    Backend(String),
}

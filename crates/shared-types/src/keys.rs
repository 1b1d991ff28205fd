//! # Key Management Capability
//!
//! Narrow interface to whatever holds the validator key shares. The signing
//! algorithm itself is opaque to the client.

use crate::errors::KeyError;
use crate::primitives::{BlsPubKey, Root, Signature};
use async_trait::async_trait;

/// Port: signing capability over the locally held validator keys.
///
/// Implementations are shared by every concurrent role task and must not
/// serialize signing for unrelated keys.
#[async_trait]
pub trait KeyManager: Send + Sync {
    /// Public keys this process can sign for.
    async fn fetch_validating_public_keys(&self) -> Result<Vec<BlsPubKey>, KeyError>;

    /// Sign a 32-byte signing root with the key behind `public_key`.
    async fn sign(&self, public_key: &BlsPubKey, signing_root: &Root)
        -> Result<Signature, KeyError>;
}

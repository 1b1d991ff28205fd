//! In-memory key manager over BLS key shares.

use async_trait::async_trait;
use shared_crypto::{BlsKeyPair, CryptoError};
use shared_types::{BlsPubKey, KeyError, KeyManager, Root, Signature};
use std::collections::HashMap;

/// Key manager holding its key shares in process memory.
///
/// The key set is fixed at construction, so concurrent signing needs no
/// locking.
pub struct LocalKeyManager {
    order: Vec<BlsPubKey>,
    keys: HashMap<BlsPubKey, BlsKeyPair>,
}

impl LocalKeyManager {
    pub fn new(keypairs: Vec<BlsKeyPair>) -> Self {
        let mut order = Vec::with_capacity(keypairs.len());
        let mut keys = HashMap::with_capacity(keypairs.len());
        for keypair in keypairs {
            let public_key = BlsPubKey::new(keypair.public_key().to_bytes());
            if keys.insert(public_key, keypair).is_none() {
                order.push(public_key);
            }
        }
        Self { order, keys }
    }

    /// Deterministic development keys for indices `start..start + count`.
    pub fn interop(start: u64, count: u64) -> Result<Self, CryptoError> {
        let keypairs = (start..start + count)
            .map(BlsKeyPair::interop)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(keypairs))
    }

    /// Public keys in insertion order.
    pub fn public_keys(&self) -> &[BlsPubKey] {
        &self.order
    }
}

#[async_trait]
impl KeyManager for LocalKeyManager {
    async fn fetch_validating_public_keys(&self) -> Result<Vec<BlsPubKey>, KeyError> {
        Ok(self.order.clone())
    }

    async fn sign(
        &self,
        public_key: &BlsPubKey,
        signing_root: &Root,
    ) -> Result<Signature, KeyError> {
        let keypair = self
            .keys
            .get(public_key)
            .ok_or(KeyError::UnknownKey(*public_key))?;
        Ok(Signature::new(keypair.sign(signing_root).to_bytes().to_vec()))
    }
}

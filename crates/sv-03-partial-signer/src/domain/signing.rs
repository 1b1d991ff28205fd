//! Signing roots for partial attestations and blocks.

use crate::error::{Result, SignerError};
use serde::Serialize;
use shared_types::{AttestationData, BeaconBlock, Root};

/// `sha256(bincode(data) || domain)`
pub fn attestation_signing_root(data: &AttestationData, domain: &[u8]) -> Result<Root> {
    object_root(data, domain)
}

/// `sha256(bincode(block) || domain)`
pub fn block_signing_root(block: &BeaconBlock, domain: &[u8]) -> Result<Root> {
    object_root(block, domain)
}

fn object_root<T: Serialize>(object: &T, domain: &[u8]) -> Result<Root> {
    let bytes = bincode::serialize(object).map_err(|e| SignerError::Encoding(e.to_string()))?;
    Ok(shared_crypto::signing_root(&bytes, domain))
}

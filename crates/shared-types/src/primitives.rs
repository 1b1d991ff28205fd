//! # Primitive Types
//!
//! Slot and epoch arithmetic, validator public keys and chain constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slot number since genesis.
pub type Slot = u64;

/// Epoch number (`slot / slots_per_epoch`).
pub type Epoch = u64;

/// Index of a validator in the beacon state registry.
pub type ValidatorIndex = u64;

/// Index of a committee within a slot.
pub type CommitteeIndex = u64;

/// 32-byte hash tree root.
pub type Root = [u8; 32];

/// Length of a compressed BLS12-381 public key.
pub const BLS_PUBKEY_LEN: usize = 48;

/// Length of a compressed BLS12-381 signature.
pub const BLS_SIGNATURE_LEN: usize = 96;

/// Compressed BLS public key identifying a validator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct BlsPubKey(pub [u8; BLS_PUBKEY_LEN]);

impl BlsPubKey {
    /// Wrap raw key bytes.
    pub const fn new(bytes: [u8; BLS_PUBKEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; BLS_PUBKEY_LEN] {
        &self.0
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated form used in log lines (`0xabcdef12…`).
    pub fn short(&self) -> String {
        format!("0x{}…", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for BlsPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for BlsPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsPubKey({})", self.short())
    }
}

impl TryFrom<&[u8]> for BlsPubKey {
    type Error = InvalidKeyLength;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; BLS_PUBKEY_LEN] = bytes
            .try_into()
            .map_err(|_| InvalidKeyLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl TryFrom<Vec<u8>> for BlsPubKey {
    type Error = InvalidKeyLength;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_slice())
    }
}

impl From<BlsPubKey> for Vec<u8> {
    fn from(key: BlsPubKey) -> Self {
        key.0.to_vec()
    }
}

/// A public key had the wrong byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid public key length: expected 48, got {0}")]
pub struct InvalidKeyLength(pub usize);

/// Opaque signature bytes bound to a key and a signed payload.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(pub Vec<u8>);

impl Signature {
    /// Wrap signature bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = &self.0[..self.0.len().min(4)];
        write!(f, "Signature(0x{}…, {} bytes)", hex::encode(prefix), self.0.len())
    }
}

/// Chain timing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Duration of one slot in seconds.
    pub seconds_per_slot: u64,
    /// Number of slots in one epoch.
    pub slots_per_epoch: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            seconds_per_slot: 12,
            slots_per_epoch: 32,
        }
    }
}

impl ChainConfig {
    /// Epoch containing `slot`.
    pub fn epoch_of(&self, slot: Slot) -> Epoch {
        slot / self.slots_per_epoch
    }

    /// First slot of `epoch`.
    pub fn epoch_start_slot(&self, epoch: Epoch) -> Slot {
        epoch.saturating_mul(self.slots_per_epoch)
    }

    /// Reject configurations the slot arithmetic cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.seconds_per_slot == 0 {
            return Err("seconds_per_slot must be greater than zero".into());
        }
        if self.slots_per_epoch == 0 {
            return Err("slots_per_epoch must be greater than zero".into());
        }
        Ok(())
    }
}

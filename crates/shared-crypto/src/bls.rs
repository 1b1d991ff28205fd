//! BLS12-381 key shares (min_pk: 48-byte public keys, 96-byte signatures).
//!
//! Each SSV operator holds one share of a validator key; the signatures made
//! here are partial and only become valid beacon signatures once the
//! coordinator reconstructs them.

use blst::min_pk::{PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::RngCore;
use zeroize::Zeroize;

use crate::hashing::sha256;
use crate::CryptoError;

/// Domain separation tag for BLS signatures (Ethereum consensus compatible)
const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// BLS public key (48 bytes compressed)
#[derive(Clone, Debug)]
pub struct BlsPublicKey(PublicKey);

impl PartialEq for BlsPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsPublicKey {}

/// BLS signature (96 bytes)
#[derive(Clone, Debug)]
pub struct BlsSignature(Signature);

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}

/// Key-generation input material, wiped on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
struct Ikm([u8; 32]);

/// BLS key pair for one validator key share
pub struct BlsKeyPair {
    secret: SecretKey,
    public: BlsPublicKey,
}

impl BlsKeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Result<Self, CryptoError> {
        let mut ikm = Ikm([0u8; 32]);
        rand::thread_rng().fill_bytes(&mut ikm.0);
        Self::from_ikm(&ikm)
    }

    /// Deterministic development key for validator `index`.
    ///
    /// The same index always yields the same key, so a local coordinator and
    /// client started with the same interop range agree on the key set.
    /// Never use these keys on a real network.
    pub fn interop(index: u64) -> Result<Self, CryptoError> {
        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&index.to_le_bytes());
        let ikm = Ikm(sha256(&seed));
        Self::from_ikm(&ikm)
    }

    fn from_ikm(ikm: &Ikm) -> Result<Self, CryptoError> {
        let secret = SecretKey::key_gen(&ikm.0, &[])
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("{e:?}")))?;
        let public = BlsPublicKey(secret.sk_to_pk());
        Ok(Self { secret, public })
    }

    /// Sign a message (normally a 32-byte signing root)
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.secret.sign(message, DST, &[]))
    }

    /// Get the public key
    pub fn public_key(&self) -> &BlsPublicKey {
        &self.public
    }
}

impl BlsPublicKey {
    /// Verify a signature against this public key
    pub fn verify(&self, message: &[u8], signature: &BlsSignature) -> bool {
        signature.0.verify(true, message, DST, &[], &self.0, true) == BLST_ERROR::BLST_SUCCESS
    }

    /// Create from 48-byte compressed representation
    pub fn from_bytes(bytes: &[u8; 48]) -> Result<Self, CryptoError> {
        PublicKey::from_bytes(bytes)
            .map(BlsPublicKey)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Serialize to 48-byte compressed form
    pub fn to_bytes(&self) -> [u8; 48] {
        self.0.to_bytes()
    }
}

impl BlsSignature {
    /// Create from 96-byte representation
    pub fn from_bytes(bytes: &[u8; 96]) -> Result<Self, CryptoError> {
        Signature::from_bytes(bytes)
            .map(BlsSignature)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Serialize to 96-byte form
    pub fn to_bytes(&self) -> [u8; 96] {
        self.0.to_bytes()
    }
}

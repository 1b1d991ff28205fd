//! SHA-256 helpers.

use sha2::{Digest, Sha256};

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Signing root: `sha256(object_bytes || domain)`.
///
/// `object_bytes` is the canonical encoding of the object being signed and
/// `domain` is the signature domain returned by the beacon node.
pub fn signing_root(object_bytes: &[u8], domain: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(object_bytes);
    hasher.update(domain);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_signing_root_binds_domain() {
        let object = b"attestation data";
        let attester = signing_root(object, &[1, 0, 0, 0]);
        let proposer = signing_root(object, &[0, 0, 0, 0]);
        assert_ne!(attester, proposer);

        let mut concatenated = object.to_vec();
        concatenated.extend_from_slice(&[1, 0, 0, 0]);
        assert_eq!(attester, sha256(&concatenated));
    }
}

//! Hashing utilities for account and ledger addresses
//!
//! Account identifiers are HASH160 digests (RIPEMD-160 of SHA-256),
//! the same construction Bitcoin uses for public key hashes.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Length in bytes of a HASH160 digest
pub const HASH160_LEN: usize = 20;

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes RIPEMD-160(SHA-256(data))
pub fn hash160(data: &[u8]) -> [u8; HASH160_LEN] {
    let mut ripemd = Ripemd160::new();
    ripemd.update(sha256(data));

    let mut out = [0u8; HASH160_LEN];
    out.copy_from_slice(&ripemd.finalize());
    out
}

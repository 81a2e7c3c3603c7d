//! Cryptographic utilities for the ledger
//!
//! This module provides:
//! - SHA-256 and HASH160 hashing
//! - ECDSA key management (secp256k1) and address derivation

pub mod hash;
pub mod keys;

pub use hash::{hash160, sha256, HASH160_LEN};
pub use keys::{public_key_to_address, KeyError, KeyPair};

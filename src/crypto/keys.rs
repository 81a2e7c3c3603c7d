//! Account keys
//!
//! An account's [`Address`] is the HASH160 of its compressed secp256k1
//! public key. The ledger never checks signatures; a key pair is just a
//! stable identity for a caller to act as.

use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::hash::hash160;
use crate::token::Address;

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
}

/// An account identity backed by a secp256k1 key
#[derive(Clone)]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random identity
    pub fn generate() -> Self {
        let (secret_key, public_key) = Secp256k1::new().generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Restore an identity from its hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        let public_key = PublicKey::from_secret_key(&Secp256k1::new(), &secret_key);
        Ok(Self {
            secret_key,
            public_key,
        })
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Ledger address owned by this key pair
    pub fn address(&self) -> Address {
        public_key_to_address(&self.public_key)
    }
}

pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    Address::from_bytes(hash160(&public_key.serialize()))
}

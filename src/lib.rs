//! Hello ERC20: a fixed-supply fungible token ledger in Rust
//!
//! This crate provides:
//! - An ERC-20 style ledger with balances, allowances and delegated transfers
//! - Transfer and Approval events returned by every successful operation
//! - A lock-protected shared handle that broadcasts events to subscribers
//! - secp256k1 key pairs for deriving account addresses
//! - JSON snapshot persistence with backup rotation
//!
//! # Example
//!
//! ```rust
//! use hello_erc20::crypto::KeyPair;
//! use hello_erc20::token::{to_base_units, Ledger, TokenError};
//!
//! let owner = KeyPair::generate().address();
//! let holder = KeyPair::generate().address();
//! let receiver = KeyPair::generate().address();
//! let mut ledger = Ledger::new(owner);
//!
//! let amount = to_base_units(15, ledger.decimals()).unwrap();
//! ledger.approve(&owner, &holder, amount).unwrap();
//!
//! // The holder moves part of the owner's funds to the receiver
//! let seven = to_base_units(7, ledger.decimals()).unwrap();
//! ledger.transfer_from(&holder, &owner, &receiver, seven).unwrap();
//! assert_eq!(ledger.allowance(&owner, &holder), amount - seven);
//!
//! // Self-transfers are rejected without touching state
//! assert_eq!(
//!     ledger.transfer(&owner, &owner, seven),
//!     Err(TokenError::InvalidRecipient)
//! );
//! ```

pub mod crypto;
pub mod storage;
pub mod token;

// Re-export commonly used types
pub use crypto::KeyPair;
pub use storage::{Storage, StorageConfig, StorageError};
pub use token::{
    Address, Amount, ApprovalEvent, Ledger, LedgerEvent, SharedLedger, TokenConfig, TokenError,
    TokenMetadata, TransferEvent,
};

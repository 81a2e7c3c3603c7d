//! ERC-20 style fungible token ledger
//!
//! Provides a fixed-supply token with:
//! - Balances per address
//! - Allowances for delegated transfers
//! - Transfer and approve operations returning their events
//!
//! # Example
//!
//! ```rust
//! use hello_erc20::token::{to_base_units, Address, Ledger};
//!
//! let owner = Address::derive(b"owner");
//! let holder = Address::derive(b"holder");
//!
//! // The creator receives the whole supply
//! let mut ledger = Ledger::new(owner);
//! assert_eq!(ledger.balance_of(&owner), ledger.total_supply());
//!
//! // Transfer 10 whole tokens
//! let ten = to_base_units(10, ledger.decimals()).unwrap();
//! let event = ledger.transfer(&owner, &holder, ten).unwrap();
//! assert_eq!(event.amount, ten);
//! assert_eq!(ledger.balance_of(&holder), ten);
//! ```

pub mod address;
pub mod amount;
pub mod error;
pub mod events;
pub mod ledger;
pub mod metadata;
pub mod shared;

pub use address::{Address, AddressError};
pub use amount::{format_units, parse_units, to_base_units, unit_scale, Amount, AmountError};
pub use error::TokenError;
pub use events::{ApprovalEvent, LedgerEvent, TransferEvent};
pub use ledger::{Ledger, MAX_EVENT_HISTORY};
pub use metadata::{
    TokenConfig, TokenMetadata, DEFAULT_DECIMALS, DEFAULT_NAME, DEFAULT_SYMBOL,
    DEFAULT_TOTAL_SUPPLY, DEFAULT_WHOLE_SUPPLY,
};
pub use shared::{EventBroadcaster, SharedLedger};

use crate::token::amount::Amount;
use thiserror::Error;

/// Token ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid recipient: cannot transfer to self")]
    InvalidRecipient,
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: Amount, need: Amount },
    #[error("Unauthorized: allowance {allowance}, need {need}")]
    Unauthorized { allowance: Amount, need: Amount },
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Invalid supply: must be greater than 0")]
    InvalidSupply,
    #[error("Invalid supply: scaled supply does not fit in 128 bits")]
    SupplyOverflow,
    #[error("Ledger invariant violated: {0}")]
    InvariantViolation(String),
}

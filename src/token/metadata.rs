//! Token parameters and immutable metadata

use crate::token::address::Address;
use crate::token::amount::{to_base_units, Amount};
use crate::token::error::TokenError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the HE2 token
pub const DEFAULT_NAME: &str = "Hello ERC20 Coin";

/// Ticker symbol of the HE2 token
pub const DEFAULT_SYMBOL: &str = "HE2";

/// Decimal places of the HE2 token
pub const DEFAULT_DECIMALS: u8 = 18;

/// Whole tokens minted to the creator at construction
pub const DEFAULT_WHOLE_SUPPLY: u128 = 1_000_000;

/// Total supply of the HE2 token in base units
pub const DEFAULT_TOTAL_SUPPLY: Amount =
    DEFAULT_WHOLE_SUPPLY * 10u128.pow(DEFAULT_DECIMALS as u32);

/// Maximum supported decimal places
pub const MAX_DECIMALS: u8 = 18;

/// Token parameters used to build a ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Supply in whole tokens; scaled by `10^decimals` at construction
    #[serde(with = "crate::token::amount::decimal_string")]
    pub whole_supply: u128,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            decimals: DEFAULT_DECIMALS,
            whole_supply: DEFAULT_WHOLE_SUPPLY,
        }
    }
}

impl TokenConfig {
    /// Check the parameters and compute the total supply in base units
    pub fn validate(&self) -> Result<Amount, TokenError> {
        if self.name.is_empty() || self.name.chars().count() > 50 {
            return Err(TokenError::InvalidName);
        }

        if self.symbol.is_empty() || self.symbol.chars().count() > 10 {
            return Err(TokenError::InvalidSymbol);
        }

        if self.decimals > MAX_DECIMALS {
            return Err(TokenError::InvalidDecimals);
        }

        if self.whole_supply == 0 {
            return Err(TokenError::InvalidSupply);
        }

        to_base_units(self.whole_supply, self.decimals).ok_or(TokenError::SupplyOverflow)
    }
}

/// Token metadata (immutable after creation)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    /// Ledger address, used to tag emitted events
    pub address: Address,
    /// Token name (e.g., "Hello ERC20 Coin")
    pub name: String,
    /// Token symbol (e.g., "HE2")
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Total supply in base units (fixed at creation)
    #[serde(with = "crate::token::amount::decimal_string")]
    pub total_supply: Amount,
    /// Account that received the initial supply
    pub creator: Address,
    /// Timestamp when created
    pub created_at: DateTime<Utc>,
}

impl TokenMetadata {
    /// Create metadata from validated parameters
    pub fn new(config: TokenConfig, creator: Address) -> Result<Self, TokenError> {
        let total_supply = config.validate()?;
        Ok(Self::from_parts(config, total_supply, creator))
    }

    pub(crate) fn from_parts(
        config: TokenConfig,
        total_supply: Amount,
        creator: Address,
    ) -> Self {
        let mut seed = creator.as_bytes().to_vec();
        seed.extend_from_slice(config.symbol.as_bytes());

        Self {
            address: Address::derive(&seed),
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
            total_supply,
            creator,
            created_at: Utc::now(),
        }
    }
}

//! ERC-20 style fixed-supply ledger
//!
//! The whole supply is minted to the creator at construction and never
//! changes afterwards. Every mutating operation validates all of its
//! preconditions before touching state, so a rejected call leaves balances,
//! allowances and the event history exactly as they were.

use crate::token::address::Address;
use crate::token::amount::Amount;
use crate::token::error::TokenError;
use crate::token::events::{ApprovalEvent, LedgerEvent, TransferEvent};
use crate::token::metadata::{TokenConfig, TokenMetadata, DEFAULT_TOTAL_SUPPLY};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Number of recent events kept in the ledger history
pub const MAX_EVENT_HISTORY: usize = 100;

/// A fungible token ledger with balances and allowances
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    metadata: TokenMetadata,
    /// Balances: address -> amount (zero balances are not stored)
    #[serde(with = "crate::token::amount::decimal_string::map")]
    balances: BTreeMap<Address, Amount>,
    /// Allowances: owner -> (spender -> amount)
    #[serde(with = "crate::token::amount::decimal_string::nested_map")]
    allowances: BTreeMap<Address, BTreeMap<Address, Amount>>,
    /// Most recent events, oldest first
    #[serde(default)]
    history: VecDeque<LedgerEvent>,
}

impl Ledger {
    /// Create the HE2 ledger with the entire supply owned by `creator`
    pub fn new(creator: Address) -> Self {
        Self::from_metadata(TokenMetadata::from_parts(
            TokenConfig::default(),
            DEFAULT_TOTAL_SUPPLY,
            creator,
        ))
    }

    /// Create a ledger from custom token parameters
    pub fn with_config(config: TokenConfig, creator: Address) -> Result<Self, TokenError> {
        Ok(Self::from_metadata(TokenMetadata::new(config, creator)?))
    }

    fn from_metadata(metadata: TokenMetadata) -> Self {
        let mut balances = BTreeMap::new();
        balances.insert(metadata.creator, metadata.total_supply);

        log::info!(
            "Ledger created: {} ({}) at {}, {} base units minted to {}",
            metadata.name,
            metadata.symbol,
            metadata.address,
            metadata.total_supply,
            metadata.creator
        );

        Self {
            metadata,
            balances,
            allowances: BTreeMap::new(),
            history: VecDeque::new(),
        }
    }

    // =========================================================================
    // ERC-20 View Functions
    // =========================================================================

    /// Get the immutable token metadata
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Ledger address used to tag events
    pub fn address(&self) -> Address {
        self.metadata.address
    }

    /// Get token name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get token symbol
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Get decimal places
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Get total supply in base units
    pub fn total_supply(&self) -> Amount {
        self.metadata.total_supply
    }

    /// Balance of an address, zero if it has never been credited
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// All holders with a non-zero balance, in address order
    pub fn holders(&self) -> Vec<(Address, Amount)> {
        self.balances
            .iter()
            .filter(|(_, &b)| b > 0)
            .map(|(a, &b)| (*a, b))
            .collect()
    }

    /// Get holder count
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|&&b| b > 0).count()
    }

    /// Sum of every balance; equals `total_supply` for any valid ledger
    pub fn circulating_supply(&self) -> Amount {
        self.balances
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    /// Recent events, oldest first
    pub fn history(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.history.iter()
    }

    // =========================================================================
    // ERC-20 Mutating Functions
    // =========================================================================

    /// Move `amount` from `caller` to `to`
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<TransferEvent, TokenError> {
        if caller == to {
            return Err(TokenError::InvalidRecipient);
        }

        let have = self.balance_of(caller);
        if have < amount {
            return Err(TokenError::InsufficientFunds { have, need: amount });
        }

        self.move_balance(caller, to, amount);

        log::debug!("transfer {} -> {}: {}", caller, to, amount);
        Ok(self.record_transfer(caller, to, amount))
    }

    /// Set the amount `spender` may move out of `caller`'s balance.
    ///
    /// Replaces any previous allowance; zero revokes it.
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<ApprovalEvent, TokenError> {
        self.set_allowance(caller, spender, amount);

        let event = ApprovalEvent {
            token: self.metadata.address,
            token_owner: *caller,
            spender: *spender,
            amount,
            timestamp: Utc::now(),
        };
        self.record(event.clone().into());

        log::debug!("approve {} for {}: {}", spender, caller, amount);
        Ok(event)
    }

    /// Move `amount` from `from` to `to` on behalf of `caller`, consuming
    /// the allowance `from` granted to `caller`.
    ///
    /// `from == to` is permitted here, unlike [`Ledger::transfer`].
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<TransferEvent, TokenError> {
        let allowance = self.allowance(from, caller);
        if allowance < amount {
            return Err(TokenError::Unauthorized {
                allowance,
                need: amount,
            });
        }

        let have = self.balance_of(from);
        if have < amount {
            return Err(TokenError::InsufficientFunds { have, need: amount });
        }

        self.move_balance(from, to, amount);
        self.set_allowance(from, caller, allowance - amount);

        log::debug!(
            "transfer_from {} -> {} by {}: {}",
            from,
            to,
            caller,
            amount
        );
        Ok(self.record_transfer(from, to, amount))
    }

    /// Check the conservation invariant.
    ///
    /// Always holds for ledgers built through this API; used to reject
    /// snapshots that were edited on disk.
    pub fn verify(&self) -> Result<(), TokenError> {
        let sum = self
            .balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            .ok_or_else(|| {
                TokenError::InvariantViolation("balance sum overflows".to_string())
            })?;

        if sum != self.metadata.total_supply {
            return Err(TokenError::InvariantViolation(format!(
                "balances sum to {}, total supply is {}",
                sum, self.metadata.total_supply
            )));
        }

        Ok(())
    }

    // =========================================================================
    // Internal state updates (callers have already validated)
    // =========================================================================

    fn move_balance(&mut self, from: &Address, to: &Address, amount: Amount) {
        if amount == 0 || from == to {
            return;
        }

        let remaining = self.balance_of(from) - amount;
        if remaining == 0 {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }

        *self.balances.entry(*to).or_insert(0) += amount;
    }

    fn set_allowance(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        if amount == 0 {
            if let Some(spenders) = self.allowances.get_mut(owner) {
                spenders.remove(spender);
                if spenders.is_empty() {
                    self.allowances.remove(owner);
                }
            }
            return;
        }

        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
    }

    fn record_transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> TransferEvent {
        let event = TransferEvent {
            token: self.metadata.address,
            from: *from,
            to: *to,
            amount,
            timestamp: Utc::now(),
        };
        self.record(event.clone().into());
        event
    }

    fn record(&mut self, event: LedgerEvent) {
        self.history.push_back(event);
        if self.history.len() > MAX_EVENT_HISTORY {
            self.history.pop_front();
        }
    }
}

//! Events emitted by ledger operations

use crate::token::address::Address;
use crate::token::amount::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transfer event (emitted when tokens are transferred)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    #[serde(with = "crate::token::amount::decimal_string")]
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
}

/// Approval event (emitted when allowance is set)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub token: Address,
    pub token_owner: Address,
    pub spender: Address,
    #[serde(with = "crate::token::amount::decimal_string")]
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
}

/// Any event a ledger can emit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LedgerEvent {
    Transfer(TransferEvent),
    Approval(ApprovalEvent),
}

impl LedgerEvent {
    /// Event name as it appears in ERC-20 logs
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer(_) => "Transfer",
            LedgerEvent::Approval(_) => "Approval",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::Transfer(e) => e.timestamp,
            LedgerEvent::Approval(e) => e.timestamp,
        }
    }
}

impl From<TransferEvent> for LedgerEvent {
    fn from(event: TransferEvent) -> Self {
        LedgerEvent::Transfer(event)
    }
}

impl From<ApprovalEvent> for LedgerEvent {
    fn from(event: ApprovalEvent) -> Self {
        LedgerEvent::Approval(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = LedgerEvent::from(TransferEvent {
            token: Address::derive(b"token"),
            from: Address::derive(b"owner"),
            to: Address::derive(b"holder"),
            amount: 10,
            timestamp: Utc::now(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Transfer\""));
        assert!(json.contains(&Address::derive(b"holder").to_string()));

        let back: LedgerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.name(), "Transfer");
    }

    #[test]
    fn test_large_amount_forwards_through_json_value() {
        let amount = 96 * 10u128.pow(18);
        let event = LedgerEvent::from(ApprovalEvent {
            token: Address::derive(b"token"),
            token_owner: Address::derive(b"owner"),
            spender: Address::derive(b"holder"),
            amount,
            timestamp: Utc::now(),
        });

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "Approval");
        assert_eq!(value["data"]["amount"], "96000000000000000000");

        let back: LedgerEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_approval_event_name() {
        let event = LedgerEvent::from(ApprovalEvent {
            token: Address::derive(b"token"),
            token_owner: Address::derive(b"owner"),
            spender: Address::derive(b"holder"),
            amount: 97,
            timestamp: Utc::now(),
        });
        assert_eq!(event.name(), "Approval");
    }
}

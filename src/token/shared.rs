//! Shared ledger handle
//!
//! [`SharedLedger`] lets many tasks use one [`Ledger`]. Mutations hold the
//! write lock for the whole validate-then-apply step, so readers never see
//! a half-applied transfer. Successful events are fanned out to subscribers
//! over a broadcast channel.

use crate::token::address::Address;
use crate::token::amount::Amount;
use crate::token::error::TokenError;
use crate::token::events::{ApprovalEvent, LedgerEvent, TransferEvent};
use crate::token::ledger::Ledger;
use crate::token::metadata::TokenMetadata;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Maximum number of events to buffer per subscriber
const BROADCAST_CAPACITY: usize = 100;

/// Broadcaster for ledger events
#[derive(Debug)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<LedgerEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { sender }
    }

    /// Send an event to every current subscriber
    pub fn broadcast(&self, event: LedgerEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, lock-protected handle to a ledger
#[derive(Clone, Debug)]
pub struct SharedLedger {
    ledger: Arc<RwLock<Ledger>>,
    events: Arc<EventBroadcaster>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            events: Arc::new(EventBroadcaster::new()),
        }
    }

    /// Receive every event emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    /// Number of live event receivers
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    /// Get the immutable token metadata
    pub async fn metadata(&self) -> TokenMetadata {
        self.ledger.read().await.metadata().clone()
    }

    /// Get total supply in base units
    pub async fn total_supply(&self) -> Amount {
        self.ledger.read().await.total_supply()
    }

    /// Balance of an address, zero if it has never been credited
    pub async fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.read().await.balance_of(account)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance
    pub async fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.ledger.read().await.allowance(owner, spender)
    }

    /// Copy of the current state, e.g. for persisting
    pub async fn snapshot(&self) -> Ledger {
        self.ledger.read().await.clone()
    }

    /// See [`Ledger::transfer`]; the event is broadcast before the lock is released
    pub async fn transfer(
        &self,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<TransferEvent, TokenError> {
        let mut ledger = self.ledger.write().await;
        let event = ledger.transfer(caller, to, amount)?;
        self.events.broadcast(event.clone().into());
        Ok(event)
    }

    /// See [`Ledger::approve`]
    pub async fn approve(
        &self,
        caller: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<ApprovalEvent, TokenError> {
        let mut ledger = self.ledger.write().await;
        let event = ledger.approve(caller, spender, amount)?;
        self.events.broadcast(event.clone().into());
        Ok(event)
    }

    /// See [`Ledger::transfer_from`]
    pub async fn transfer_from(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<TransferEvent, TokenError> {
        let mut ledger = self.ledger.write().await;
        let event = ledger.transfer_from(caller, from, to, amount)?;
        self.events.broadcast(event.clone().into());
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn tokens(count: u128) -> Amount {
        count * 10u128.pow(18)
    }

    #[test]
    fn test_broadcast_with_no_subscribers() {
        let broadcaster = EventBroadcaster::new();
        assert_eq!(broadcaster.subscriber_count(), 0);

        let mut ledger = Ledger::new(Address::derive(b"owner"));
        let event = ledger
            .approve(&Address::derive(b"owner"), &Address::derive(b"holder"), 1)
            .unwrap();
        broadcaster.broadcast(event.into());
    }

    #[tokio::test]
    async fn test_transfer_is_broadcast() {
        let owner = Address::derive(b"owner");
        let holder = Address::derive(b"holder");
        let shared = SharedLedger::new(Ledger::new(owner));
        let mut rx = shared.subscribe();

        shared.transfer(&owner, &holder, tokens(10)).await.unwrap();

        match rx.recv().await.unwrap() {
            LedgerEvent::Transfer(e) => {
                assert_eq!((e.from, e.to, e.amount), (owner, holder, tokens(10)));
            }
            other => panic!("expected Transfer, got {:?}", other),
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(shared.balance_of(&holder).await, tokens(10));
    }

    #[tokio::test]
    async fn test_failures_are_not_broadcast() {
        let owner = Address::derive(b"owner");
        let holder = Address::derive(b"holder");
        let shared = SharedLedger::new(Ledger::new(owner));
        let mut rx = shared.subscribe();

        assert_eq!(
            shared.transfer(&owner, &owner, 1).await,
            Err(TokenError::InvalidRecipient)
        );
        assert!(shared
            .transfer_from(&holder, &owner, &holder, 1)
            .await
            .is_err());

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_delegated_flow() {
        let owner = Address::derive(b"owner");
        let holder = Address::derive(b"holder");
        let receiver = Address::derive(b"receiver");
        let shared = SharedLedger::new(Ledger::new(owner));
        let mut rx = shared.subscribe();

        shared.approve(&owner, &holder, tokens(15)).await.unwrap();
        shared
            .transfer_from(&holder, &owner, &receiver, tokens(7))
            .await
            .unwrap();

        assert_eq!(shared.allowance(&owner, &holder).await, tokens(8));
        assert_eq!(shared.balance_of(&receiver).await, tokens(7));
        assert_eq!(rx.recv().await.unwrap().name(), "Approval");
        assert_eq!(rx.recv().await.unwrap().name(), "Transfer");
    }

    #[tokio::test]
    async fn test_concurrent_transfers_conserve_supply() {
        let owner = Address::derive(b"owner");
        let shared = SharedLedger::new(Ledger::new(owner));
        let accounts: Vec<Address> = (0u8..8).map(|i| Address::derive(&[i])).collect();

        for account in &accounts {
            shared.transfer(&owner, account, tokens(100)).await.unwrap();
        }

        let mut handles = Vec::new();
        for (i, from) in accounts.iter().copied().enumerate() {
            let to = accounts[(i + 1) % accounts.len()];
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    let _ = shared.transfer(&from, &to, tokens(3)).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = shared.snapshot().await;
        assert_eq!(snapshot.circulating_supply(), snapshot.total_supply());
        assert!(snapshot.verify().is_ok());
        assert_eq!(shared.total_supply().await, tokens(1_000_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_subscribers_see_ledger_order() {
        let owner = Address::derive(b"owner");
        let accounts: Vec<Address> = (0u8..8).map(|i| Address::derive(&[i])).collect();

        for _ in 0..20 {
            let shared = SharedLedger::new(Ledger::new(owner));
            let mut rx = shared.subscribe();

            let mut handles = Vec::new();
            for (i, to) in accounts.iter().copied().enumerate() {
                let shared = shared.clone();
                handles.push(tokio::spawn(async move {
                    for n in 0..10u128 {
                        shared
                            .transfer(&owner, &to, (i as u128) * 100 + n + 1)
                            .await
                            .unwrap();
                    }
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }

            // 80 events fit both the history and the broadcast buffer
            let snapshot = shared.snapshot().await;
            let recorded: Vec<LedgerEvent> = snapshot.history().cloned().collect();
            assert_eq!(recorded.len(), 80);

            let mut received = Vec::new();
            while let Ok(event) = rx.try_recv() {
                received.push(event);
            }
            assert_eq!(received, recorded);
        }
    }
}

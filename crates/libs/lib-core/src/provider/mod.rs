//! # Wallet Provider Boundary
//!
//! The connection core never talks to a wallet directly; it goes through
//! [`WalletProvider`], which mirrors the EIP-1193 surface an injected wallet
//! exposes: a JSON-RPC style `request` and push notifications for account and
//! chain changes.
//!
//! Push notifications arrive through an [`EventSubscription`], an ordered
//! channel the manager drains on its single control task. Dropping the
//! subscription removes the listeners from the provider.
//!
//! Futures are `?Send`: the browser implementation awaits JS promises, which
//! are bound to the page's only thread.

use std::fmt;
use std::time::Duration;

use async_channel::Receiver;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

#[cfg(test)]
pub mod mock;

/// JSON-RPC method names used by the core.
pub mod methods {
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const CHAIN_ID: &str = "eth_chainId";
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
    pub const ADD_CHAIN: &str = "wallet_addEthereumChain";
    pub const GET_BALANCE: &str = "eth_getBalance";
    pub const CALL: &str = "eth_call";
    pub const ESTIMATE_GAS: &str = "eth_estimateGas";
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
    pub const GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
}

/// Identity of the wallet behind a provider.
///
/// This is the opaque "provider handle" stored in the session: enough to
/// show which wallet is connected, nothing the core acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub is_metamask: bool,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, is_metamask: bool) -> Self {
        Self {
            name: name.into(),
            is_metamask,
        }
    }
}

/// Notification pushed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// `accountsChanged`: the newly exposed accounts, most relevant first.
    AccountsChanged(Vec<String>),
    /// `chainChanged`: the new active chain.
    ChainChanged(u64),
}

/// Injected wallet provider.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Identity of the wallet, stored as the session's provider handle.
    fn info(&self) -> ProviderInfo;

    /// Issue a JSON-RPC request (`params` is the positional parameter array).
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Register for `accountsChanged` and `chainChanged`.
    fn subscribe(&self) -> Result<EventSubscription, ProviderError>;

    /// Yield to the host for `duration`; used between receipt polls.
    async fn pause(&self, duration: Duration);
}

/// Ordered stream of provider notifications.
///
/// Listeners are removed from the provider when the subscription is dropped
/// or [`unsubscribe`](EventSubscription::unsubscribe) is called.
pub struct EventSubscription {
    events: Receiver<ProviderEvent>,
    on_unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl EventSubscription {
    pub fn new(events: Receiver<ProviderEvent>, on_unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            events,
            on_unsubscribe: Some(Box::new(on_unsubscribe)),
        }
    }

    /// Wait for the next notification; `None` once the provider side is closed.
    pub async fn next(&self) -> Option<ProviderEvent> {
        self.events.recv().await.ok()
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(on_unsubscribe) = self.on_unsubscribe.take() {
            self.events.close();
            on_unsubscribe();
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSubscription")
            .field("queued", &self.events.len())
            .field("active", &self.on_unsubscribe.is_some())
            .finish()
    }
}

// region: --- Response parsing

/// Parse an account list response (`eth_accounts`, `eth_requestAccounts`, `accountsChanged`).
pub fn parse_accounts(value: &Value) -> Result<Vec<String>, ProviderError> {
    let items = value
        .as_array()
        .ok_or_else(|| ProviderError::internal(format!("expected account array, got {}", value)))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ProviderError::internal(format!("account is not a string: {}", item)))
        })
        .collect()
}

/// Parse a chain id response (`eth_chainId`, `chainChanged`).
pub fn parse_chain_id(value: &Value) -> Result<u64, ProviderError> {
    match value {
        Value::String(raw) => shared::dto::network::parse_chain_id(raw)
            .ok_or_else(|| ProviderError::internal(format!("invalid chain id '{}'", raw))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ProviderError::internal(format!("invalid chain id {}", n))),
        other => Err(ProviderError::internal(format!("invalid chain id {}", other))),
    }
}

// endregion: --- Response parsing

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_parse_accounts() {
        let accounts = parse_accounts(&json!(["0xaaa", "0xbbb"])).unwrap();
        assert_eq!(accounts, vec!["0xaaa".to_string(), "0xbbb".to_string()]);
        assert!(parse_accounts(&json!([])).unwrap().is_empty());
        assert!(parse_accounts(&json!("0xaaa")).is_err());
        assert!(parse_accounts(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id(&json!("0x89")).unwrap(), 137);
        assert_eq!(parse_chain_id(&json!(1)).unwrap(), 1);
        assert!(parse_chain_id(&json!(null)).is_err());
        assert!(parse_chain_id(&json!("mainnet")).is_err());
    }

    #[tokio::test]
    async fn test_subscription_delivers_in_order_and_unsubscribes_on_drop() {
        let (tx, rx) = async_channel::unbounded();
        let released = Rc::new(Cell::new(false));
        let flag = released.clone();
        let subscription = EventSubscription::new(rx, move || flag.set(true));

        tx.try_send(ProviderEvent::ChainChanged(1)).unwrap();
        tx.try_send(ProviderEvent::ChainChanged(137)).unwrap();

        assert_eq!(subscription.next().await, Some(ProviderEvent::ChainChanged(1)));
        assert_eq!(subscription.next().await, Some(ProviderEvent::ChainChanged(137)));

        drop(subscription);
        assert!(released.get());
        assert!(tx.is_closed());
    }

    #[test]
    fn test_explicit_unsubscribe_runs_once() {
        let (_tx, rx) = async_channel::unbounded();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let subscription = EventSubscription::new(rx, move || counter.set(counter.get() + 1));

        subscription.unsubscribe();
        assert_eq!(calls.get(), 1);
    }
}

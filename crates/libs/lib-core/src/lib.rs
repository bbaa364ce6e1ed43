//! # Core Library
//!
//! Wallet connection core: the provider boundary, the session and its
//! store, the connection manager and the ERC-20 binding.
//!
//! The web front end owns a [`ConnectionManager`] over the browser's
//! injected provider; everything here is also driven by an in-memory
//! provider in tests.

pub mod balance;
pub mod config;
pub mod contract;
pub mod error;
pub mod manager;
pub mod provider;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use balance::{fetch_native_balance, NativeBalance};
pub use config::{core_config, init_config, ChainChangePolicy, WalletConfig};
pub use contract::{Erc20, PendingTransaction, TransactionReceipt};
pub use error::{ProviderError, Result, Severity, WalletError};
pub use manager::ConnectionManager;
pub use provider::{EventSubscription, ProviderEvent, ProviderInfo, WalletProvider};
pub use session::{ConnectionState, NetworkStatus, Session};
pub use store::{SessionStore, Snapshot};

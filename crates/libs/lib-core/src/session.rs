//! # Connection Session
//!
//! The application's record of the connected account, its chain and the
//! wallet behind it. A session is a plain value: every transition builds a
//! new one and the store swaps it in whole.

use serde::Serialize;
use shared::dto::network::{network_info, NetworkInfo};

use crate::provider::ProviderInfo;

/// Connection lifecycle state derived from a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Network as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    /// No chain known (not connected).
    Unknown,
    Supported(&'static NetworkInfo),
    /// Active chain outside the supported table.
    Unsupported(u64),
}

/// Current connection session.
///
/// `account` and `provider` are either both set or both empty; `chain_id`
/// is only set alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    account: Option<String>,
    chain_id: Option<u64>,
    provider: Option<ProviderInfo>,
    connecting: bool,
}

impl Session {
    /// Empty session (initial state).
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Empty session waiting on a connect request.
    pub fn connecting() -> Self {
        Self {
            connecting: true,
            ..Self::default()
        }
    }

    pub fn connected(account: String, chain_id: u64, provider: ProviderInfo) -> Self {
        Self {
            account: Some(account),
            chain_id: Some(chain_id),
            provider: Some(provider),
            connecting: false,
        }
    }

    /// Same connection, different account. Returns `None` when not connected.
    pub fn with_account(&self, account: String) -> Option<Self> {
        match (&self.chain_id, &self.provider) {
            (Some(chain_id), Some(provider)) => {
                Some(Self::connected(account, *chain_id, provider.clone()))
            }
            _ => None,
        }
    }

    /// Same connection on another chain. Returns `None` when not connected.
    pub fn with_chain(&self, chain_id: u64) -> Option<Self> {
        match (&self.account, &self.provider) {
            (Some(account), Some(provider)) => {
                Some(Self::connected(account.clone(), chain_id, provider.clone()))
            }
            _ => None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.is_connected() {
            ConnectionState::Connected
        } else if self.connecting {
            ConnectionState::Connecting
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some() && self.provider.is_some()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn provider(&self) -> Option<&ProviderInfo> {
        self.provider.as_ref()
    }

    /// Metadata of the active chain, if it is a supported one.
    pub fn network(&self) -> Option<&'static NetworkInfo> {
        self.chain_id.and_then(network_info)
    }

    pub fn network_status(&self) -> NetworkStatus {
        match self.chain_id {
            None => NetworkStatus::Unknown,
            Some(chain_id) => match network_info(chain_id) {
                Some(info) => NetworkStatus::Supported(info),
                None => NetworkStatus::Unsupported(chain_id),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metamask() -> ProviderInfo {
        ProviderInfo::new("MetaMask", true)
    }

    #[test]
    fn test_state_derivation() {
        assert_eq!(Session::disconnected().state(), ConnectionState::Disconnected);
        assert_eq!(Session::connecting().state(), ConnectionState::Connecting);

        let session = Session::connected("0xaaa".to_string(), 1, metamask());
        assert_eq!(session.state(), ConnectionState::Connected);
        assert_eq!(session.account(), Some("0xaaa"));
        assert_eq!(session.chain_id(), Some(1));
    }

    #[test]
    fn test_with_account_requires_connection() {
        assert!(Session::disconnected().with_account("0xaaa".to_string()).is_none());
        assert!(Session::connecting().with_chain(1).is_none());

        let session = Session::connected("0xaaa".to_string(), 1, metamask());
        let switched = session.with_account("0xbbb".to_string()).unwrap();
        assert_eq!(switched.account(), Some("0xbbb"));
        assert_eq!(switched.chain_id(), Some(1));
        assert_eq!(switched.provider(), Some(&metamask()));
    }

    #[test]
    fn test_network_status() {
        assert_eq!(Session::disconnected().network_status(), NetworkStatus::Unknown);

        let polygon = Session::connected("0xaaa".to_string(), 137, metamask());
        assert_eq!(polygon.network().map(|n| n.name), Some("Polygon Mainnet"));

        let unknown = Session::connected("0xaaa".to_string(), 9999, metamask());
        assert!(unknown.network().is_none());
        assert_eq!(unknown.network_status(), NetworkStatus::Unsupported(9999));
        assert!(unknown.is_connected());
    }
}

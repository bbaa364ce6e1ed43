//! # Token DTOs
//!
//! ERC-20 token metadata as shown in the contract panel, the status of a
//! token transfer, and a small table of well-known token addresses per chain.

use serde::{Deserialize, Serialize};

/// ERC-20 token information read from a contract.
///
/// Amounts are already formatted with the token's decimals for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    pub balance: String,
}

/// Lifecycle of a submitted token transfer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Idle,
    Pending {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hash: Option<String>,
    },
    Success {
        message: String,
        hash: String,
    },
    Error {
        message: String,
    },
}

impl TransactionStatus {
    pub fn pending(message: impl Into<String>) -> Self {
        TransactionStatus::Pending {
            message: message.into(),
            hash: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionStatus::Pending { .. })
    }

    /// Transaction hash, once one is known.
    pub fn hash(&self) -> Option<&str> {
        match self {
            TransactionStatus::Pending { hash, .. } => hash.as_deref(),
            TransactionStatus::Success { hash, .. } => Some(hash),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            TransactionStatus::Idle => None,
            TransactionStatus::Pending { message, .. }
            | TransactionStatus::Success { message, .. }
            | TransactionStatus::Error { message } => Some(message),
        }
    }
}

/// Well-known token addresses, keyed by chain id.
pub const KNOWN_TOKENS: &[(u64, &str, &str)] = &[
    (11155111, "USDC", "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
    (5, "TEST_TOKEN", "0x0000000000000000000000000000000000000000"),
    (1, "USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
    (1, "DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F"),
    (137, "USDC", "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
    (80001, "TEST_TOKEN", "0x0000000000000000000000000000000000000000"),
];

/// Tokens listed for a chain as `(name, address)` pairs.
pub fn known_tokens(chain_id: u64) -> Vec<(&'static str, &'static str)> {
    KNOWN_TOKENS
        .iter()
        .filter(|(chain, _, _)| *chain == chain_id)
        .map(|(_, name, address)| (*name, *address))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens_per_chain() {
        let mainnet = known_tokens(1);
        assert_eq!(mainnet.len(), 2);
        assert_eq!(mainnet[0].0, "USDC");
        assert!(known_tokens(9999).is_empty());
    }

    #[test]
    fn test_transaction_status_accessors() {
        let idle = TransactionStatus::default();
        assert_eq!(idle, TransactionStatus::Idle);
        assert!(idle.message().is_none());

        let pending = TransactionStatus::Pending {
            message: "Waiting for confirmation...".to_string(),
            hash: Some("0xabc".to_string()),
        };
        assert!(pending.is_pending());
        assert_eq!(pending.hash(), Some("0xabc"));

        let failed = TransactionStatus::Error {
            message: "Transaction rejected by user".to_string(),
        };
        assert!(failed.hash().is_none());
        assert_eq!(failed.message(), Some("Transaction rejected by user"));
    }

    #[test]
    fn test_transaction_status_serialization() {
        let json = serde_json::to_value(TransactionStatus::pending("Sending...")).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "pending", "message": "Sending..." }));
    }
}

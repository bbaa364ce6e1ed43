//! # Centralized Error Handling
//!
//! This module defines [`WalletError`], the error type returned by every
//! operation of the connection core, and [`ProviderError`], the raw rejection
//! a wallet provider hands back for a failed request.
//!
//! ## Error Categories
//!
//! 1. **Wallet availability**
//!    - [`ProviderMissing`](WalletError::ProviderMissing) → prompt the user to install a wallet
//!    - [`NoAccountsReturned`](WalletError::NoAccountsReturned)
//!
//! 2. **User decisions** (informational, never retried)
//!    - [`UserRejected`](WalletError::UserRejected)
//!
//! 3. **Network selection**
//!    - [`UnrecognizedChain`](WalletError::UnrecognizedChain) → handled by register-then-switch
//!    - [`NetworkUnsupported`](WalletError::NetworkUnsupported) → warning, app stays usable
//!
//! 4. **Everything else** is surfaced verbatim
//!    - [`Provider`](WalletError::Provider), [`Transaction`](WalletError::Transaction),
//!      [`Decoding`](WalletError::Decoding), [`InvalidInput`](WalletError::InvalidInput)
//!
//! ## Propagation Policy
//!
//! Failures are returned to the operation boundary (a UI action) which turns
//! them into a notification using [`WalletError::severity`] and
//! [`WalletError::user_message`]. Nothing here panics or retries on its own.
//!
//! ```rust
//! use lib_core::error::{ProviderError, WalletError};
//!
//! let err: WalletError = ProviderError::new(4001, "User rejected the request.").into();
//! assert!(matches!(err, WalletError::UserRejected(_)));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Convenience type alias for `Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;

// region: --- ProviderError

/// An EIP-1193 request rejection as reported by the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message} (code {code})")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderError {
    /// The user declined the prompt.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested method or account has not been authorized.
    pub const UNAUTHORIZED: i64 = 4100;
    /// The provider does not support the method.
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The provider is disconnected from all chains.
    pub const DISCONNECTED: i64 = 4900;
    /// The chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// A request of the same kind is already waiting for the user.
    pub const REQUEST_PENDING: i64 = -32002;
    /// Catch-all for failures without a JSON-RPC code (bridge errors, bad payloads).
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL, message)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Self::USER_REJECTED
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Self::UNRECOGNIZED_CHAIN
    }
}

// endregion: --- ProviderError

// region: --- WalletError

/// How loudly the UI should report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Error type for all connection-core operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    /// No injected wallet provider is present in the page.
    #[error("No wallet provider installed")]
    ProviderMissing,

    /// The user declined a permission, network or transaction prompt.
    #[error("Request rejected by user: {0}")]
    UserRejected(String),

    /// The wallet does not know the requested chain.
    #[error("Chain {0} is not registered in the wallet")]
    UnrecognizedChain(u64),

    /// Permission was granted but the wallet returned an empty account list.
    #[error("Wallet returned no accounts")]
    NoAccountsReturned,

    /// The chain id is not present in the supported network table.
    #[error("Network with chain id {0} is not supported")]
    NetworkUnsupported(u64),

    /// A connect or network switch is already waiting on the wallet.
    #[error("Another {0} request is already in progress")]
    OperationInFlight(&'static str),

    /// A state-mutating contract call was attempted without a connected account.
    #[error("A connected account is required to sign this transaction")]
    SignerRequired,

    /// Transaction failed after submission (reverted or never confirmed).
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Provider returned a payload that could not be interpreted.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Invalid user input (address, amount).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any other provider or runtime failure, surfaced verbatim.
    #[error("Provider error: {0}")]
    Provider(ProviderError),
}

impl WalletError {
    /// Short stable identifier, used as a key by the UI.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::ProviderMissing => "ProviderMissing",
            WalletError::UserRejected(_) => "UserRejected",
            WalletError::UnrecognizedChain(_) => "UnrecognizedChain",
            WalletError::NoAccountsReturned => "NoAccountsReturned",
            WalletError::NetworkUnsupported(_) => "NetworkUnsupported",
            WalletError::OperationInFlight(_) => "OperationInFlight",
            WalletError::SignerRequired => "SignerRequired",
            WalletError::Transaction(_) => "Transaction",
            WalletError::Decoding(_) => "Decoding",
            WalletError::InvalidInput(_) => "InvalidInput",
            WalletError::Provider(_) => "Provider",
        }
    }

    /// Notification level for this error.
    pub fn severity(&self) -> Severity {
        match self {
            WalletError::UserRejected(_) | WalletError::OperationInFlight(_) => Severity::Info,
            WalletError::ProviderMissing
            | WalletError::NetworkUnsupported(_)
            | WalletError::SignerRequired
            | WalletError::InvalidInput(_) => Severity::Warning,
            WalletError::UnrecognizedChain(_)
            | WalletError::NoAccountsReturned
            | WalletError::Transaction(_)
            | WalletError::Decoding(_)
            | WalletError::Provider(_) => Severity::Error,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            WalletError::ProviderMissing => {
                "MetaMask is not installed. Install a browser wallet to continue.".to_string()
            }
            WalletError::UserRejected(_) => "Request rejected by user".to_string(),
            WalletError::UnrecognizedChain(chain_id) => {
                format!("Could not add network {} to the wallet", chain_id)
            }
            WalletError::NoAccountsReturned => "No accounts available".to_string(),
            WalletError::NetworkUnsupported(chain_id) => format!(
                "Current network (Chain ID: {}) is not supported. Please switch to a supported network.",
                chain_id
            ),
            WalletError::OperationInFlight(_) => {
                "Please finish the pending request in your wallet".to_string()
            }
            WalletError::Provider(err) => err.message.clone(),
            WalletError::SignerRequired
            | WalletError::Transaction(_)
            | WalletError::Decoding(_)
            | WalletError::InvalidInput(_) => self.to_string(),
        }
    }
}

/// Convert a provider rejection; user rejections get their own variant.
impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        if err.is_user_rejection() {
            WalletError::UserRejected(err.message)
        } else {
            WalletError::Provider(err)
        }
    }
}

/// Convert `serde_json::Error` to `WalletError`.
impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Decoding(format!("JSON error: {}", err))
    }
}

// endregion: --- WalletError

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_maps_to_dedicated_variant() {
        let err: WalletError = ProviderError::new(4001, "User denied account authorization").into();
        assert_eq!(
            err,
            WalletError::UserRejected("User denied account authorization".to_string())
        );
        assert_eq!(err.severity(), Severity::Info);
    }

    #[test]
    fn test_other_provider_errors_are_kept_verbatim() {
        let raw = ProviderError::new(-32002, "Request of type 'wallet_requestPermissions' already pending");
        let err: WalletError = raw.clone().into();
        assert_eq!(err, WalletError::Provider(raw));
        assert_eq!(
            err.user_message(),
            "Request of type 'wallet_requestPermissions' already pending"
        );
        assert_eq!(err.severity(), Severity::Error);
    }

    #[test]
    fn test_severity_and_codes() {
        assert_eq!(WalletError::ProviderMissing.severity(), Severity::Warning);
        assert_eq!(WalletError::NetworkUnsupported(9999).severity(), Severity::Warning);
        assert_eq!(WalletError::NetworkUnsupported(9999).code(), "NetworkUnsupported");
        assert_eq!(WalletError::NoAccountsReturned.severity(), Severity::Error);
    }

    #[test]
    fn test_provider_error_deserializes_from_rpc_shape() {
        let raw: ProviderError = serde_json::from_value(serde_json::json!({
            "code": 4902,
            "message": "Unrecognized chain ID \"0x2710\"."
        }))
        .unwrap();
        assert!(raw.is_unrecognized_chain());
        assert!(raw.data.is_none());
    }
}

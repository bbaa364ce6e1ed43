//! # Wallet Configuration
//!
//! Tunables for the connection core, loaded from environment variables with
//! defaults. In the browser the environment is empty, so the defaults apply.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::{core_config, init_config};
//!
//! init_config().unwrap();
//! let refresh = core_config().balance_refresh_ms;
//! ```
//!
//! `core_config()` falls back to the defaults when [`init_config()`] was never called.
//!
//! ## Variables
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `WALLET_CHAIN_CHANGE_POLICY` | `reload` | `reload` or `resync` on chain change |
//! | `WALLET_BALANCE_REFRESH_MS` | `10000` | Native balance polling period |
//! | `WALLET_RECEIPT_POLL_MS` | `1500` | Delay between receipt polls |
//! | `WALLET_RECEIPT_MAX_POLLS` | `120` | Receipt polls before giving up |
//! | `WALLET_DEFAULT_TOKEN_DECIMALS` | `18` | Decimals used before token info is read |

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use lib_utils::envs::{get_env_or, get_env_parse_or};
use lib_utils::validation::validate_range;

/// What happens to chain-dependent state when the wallet switches chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainChangePolicy {
    /// Hard reload of the whole application.
    #[default]
    Reload,
    /// Keep running and bump the store epoch; every chain-dependent consumer re-fetches.
    Resync,
}

impl FromStr for ChainChangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reload" => Ok(ChainChangePolicy::Reload),
            "resync" => Ok(ChainChangePolicy::Resync),
            other => Err(format!(
                "WALLET_CHAIN_CHANGE_POLICY must be 'reload' or 'resync', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for ChainChangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainChangePolicy::Reload => write!(f, "reload"),
            ChainChangePolicy::Resync => write!(f, "resync"),
        }
    }
}

/// Connection core configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConfig {
    pub chain_change_policy: ChainChangePolicy,

    /// Native balance polling period while connected.
    pub balance_refresh_ms: u32,

    /// Delay between `eth_getTransactionReceipt` polls.
    pub receipt_poll_ms: u32,

    /// Receipt polls before a pending transaction is reported as unconfirmed.
    pub receipt_max_polls: u32,

    /// Token decimals assumed until the token's own value has been read.
    pub default_token_decimals: u8,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            chain_change_policy: ChainChangePolicy::Reload,
            balance_refresh_ms: 10_000,
            receipt_poll_ms: 1_500,
            receipt_max_polls: 120,
            default_token_decimals: 18,
        }
    }
}

impl WalletConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let chain_change_policy =
            get_env_or("WALLET_CHAIN_CHANGE_POLICY", &defaults.chain_change_policy.to_string())
                .parse()?;

        let balance_refresh_ms =
            get_env_parse_or("WALLET_BALANCE_REFRESH_MS", defaults.balance_refresh_ms)
                .map_err(|e| e.to_string())?;

        let receipt_poll_ms = get_env_parse_or("WALLET_RECEIPT_POLL_MS", defaults.receipt_poll_ms)
            .map_err(|e| e.to_string())?;

        let receipt_max_polls =
            get_env_parse_or("WALLET_RECEIPT_MAX_POLLS", defaults.receipt_max_polls)
                .map_err(|e| e.to_string())?;

        let default_token_decimals =
            get_env_parse_or("WALLET_DEFAULT_TOKEN_DECIMALS", defaults.default_token_decimals)
                .map_err(|e| e.to_string())?;

        Ok(Self {
            chain_change_policy,
            balance_refresh_ms,
            receipt_poll_ms,
            receipt_max_polls,
            default_token_decimals,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        validate_range(self.balance_refresh_ms, 1_000, 600_000, "WALLET_BALANCE_REFRESH_MS")?;
        validate_range(self.receipt_poll_ms, 100, 60_000, "WALLET_RECEIPT_POLL_MS")?;
        validate_range(self.receipt_max_polls, 1, 10_000, "WALLET_RECEIPT_MAX_POLLS")?;
        // U256 holds at most 77 decimal digits
        validate_range(self.default_token_decimals, 0, 77, "WALLET_DEFAULT_TOKEN_DECIMALS")?;
        Ok(())
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<WalletConfig> = OnceLock::new();

/// Initialize the global configuration from the environment.
///
/// # Errors
///
/// Returns an error if:
/// - A variable is present but malformed
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    let config = WalletConfig::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// Uninitialized access yields the defaults rather than panicking: the
/// browser build has no environment to read from.
pub fn core_config() -> &'static WalletConfig {
    CONFIG.get_or_init(WalletConfig::default)
}

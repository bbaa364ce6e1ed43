//! # Supported Networks
//!
//! Static table of the EVM networks the dashboard knows about, plus the
//! wire shapes used when asking a wallet to switch to or register one of them.
//!
//! The table feeds both the network picker and the `wallet_addEthereumChain`
//! request sent when a wallet does not recognize the selected chain.

use serde::{Deserialize, Serialize};

/// Native currencies on every supported network use 18 decimals.
pub const NATIVE_DECIMALS: u8 = 18;

/// Metadata for a supported network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_url: &'static str,
    pub explorer: &'static str,
    pub currency: &'static str,
    pub currency_symbol: &'static str,
}

impl NetworkInfo {
    /// Chain id in the `0x`-prefixed hex form wallets expect.
    pub fn chain_id_hex(&self) -> String {
        chain_id_to_hex(self.chain_id)
    }

    /// Build the `wallet_addEthereumChain` parameter object for this network.
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.name.to_string(),
            rpc_urls: vec![self.rpc_url.to_string()],
            native_currency: NativeCurrency {
                name: self.currency.to_string(),
                symbol: self.currency_symbol.to_string(),
                decimals: NATIVE_DECIMALS,
            },
            block_explorer_urls: vec![self.explorer.to_string()],
        }
    }
}

/// All networks offered in the picker, in display order.
pub const SUPPORTED_NETWORKS: &[NetworkInfo] = &[
    NetworkInfo {
        name: "Ethereum Mainnet",
        chain_id: 1,
        rpc_url: "https://eth.llamarpc.com",
        explorer: "https://etherscan.io",
        currency: "ETH",
        currency_symbol: "ETH",
    },
    NetworkInfo {
        name: "Goerli Testnet",
        chain_id: 5,
        rpc_url: "https://goerli.infura.io/v3/",
        explorer: "https://goerli.etherscan.io",
        currency: "ETH",
        currency_symbol: "ETH",
    },
    NetworkInfo {
        name: "Sepolia Testnet",
        chain_id: 11155111,
        rpc_url: "https://sepolia.infura.io/v3/",
        explorer: "https://sepolia.etherscan.io",
        currency: "ETH",
        currency_symbol: "ETH",
    },
    NetworkInfo {
        name: "Polygon Mainnet",
        chain_id: 137,
        rpc_url: "https://polygon-rpc.com",
        explorer: "https://polygonscan.com",
        currency: "MATIC",
        currency_symbol: "MATIC",
    },
    NetworkInfo {
        name: "Mumbai Testnet",
        chain_id: 80001,
        rpc_url: "https://rpc-mumbai.maticvigil.com",
        explorer: "https://mumbai.polygonscan.com",
        currency: "MATIC",
        currency_symbol: "MATIC",
    },
];

/// Look up a network by chain id.
///
/// Returns `None` for chains outside [`SUPPORTED_NETWORKS`]; callers treat
/// that as the "unsupported network" warning path.
pub fn network_info(chain_id: u64) -> Option<&'static NetworkInfo> {
    SUPPORTED_NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Whether the chain id appears in the static table.
pub fn is_network_supported(chain_id: u64) -> bool {
    network_info(chain_id).is_some()
}

/// Format a chain id as `0x`-prefixed lowercase hex.
pub fn chain_id_to_hex(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}

/// Parse a chain id as reported by a wallet.
///
/// Wallets report hex strings (`"0x89"`), but some legacy providers emit
/// decimal strings, so both are accepted.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Parameter object for `wallet_switchEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParams {
    pub chain_id: String,
}

impl SwitchChainParams {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: chain_id_to_hex(chain_id),
        }
    }
}

/// Parameter object for `wallet_addEthereumChain` (EIP-3085).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

/// Native currency description inside [`AddChainParams`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

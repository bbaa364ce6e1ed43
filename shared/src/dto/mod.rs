//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged between the connection core, the wallet
//! provider and the web front end.
//!
//! ## Module Organization
//!
//! - [`network`] - Supported network table and chain switch/registration params
//! - [`token`] - ERC-20 token info, transfer status and known token addresses
//!
//! ## Serialization Format
//!
//! Structures sent to the wallet follow the JSON-RPC wire format wallets
//! expect, so they use `#[serde(rename_all = "camelCase")]`:
//!
//! ```text
//! wallet_addEthereumChain
//!
//! [{
//!   "chainId": "0x89",
//!   "chainName": "Polygon Mainnet",
//!   "rpcUrls": ["https://polygon-rpc.com"],
//!   "nativeCurrency": { "name": "MATIC", "symbol": "MATIC", "decimals": 18 },
//!   "blockExplorerUrls": ["https://polygonscan.com"]
//! }]
//! ```

pub mod network;
pub mod token;

pub use network::*;
pub use token::*;

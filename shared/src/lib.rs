//! # Shared Types Library
//!
//! Types and helpers shared by the connection core (`lib-core`) and the
//! browser front end (`wallet-web`).
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::network`]**: Supported network table and wallet chain params
//!   - **[`dto::token`]**: ERC-20 token info and transfer status
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::format_balance`]**: Format smallest-unit amounts
//!   - **[`utils::explorer_tx_url`]**: Block explorer links
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::network::network_info;
//! use shared::utils::truncate_address;
//!
//! let network = network_info(137).unwrap();
//! assert_eq!(network.currency_symbol, "MATIC");
//!
//! let display = truncate_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
//! assert_eq!(display, "0x5aAe...eAed");
//! ```

pub mod dto;
pub mod utils;

// Wildcard re-exports: everything in this crate is public API
pub use dto::*;
pub use utils::*;

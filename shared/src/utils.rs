//! # Shared Utility Functions
//!
//! Formatting and parsing helpers used by the connection core and the web front end.
//!
//! ## Address Formatting
//!
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `format_address` with the dashboard defaults (6 and 4)
//! - [`is_valid_address`] - EVM address validation with EIP-55 checksum support
//!
//! ## Amounts
//!
//! - [`format_balance`] - Smallest-unit integer to fixed-precision display string
//! - [`parse_amount`] - User-entered decimal amount to smallest-unit integer
//! - [`format_number`] - Thousands separators
//!
//! ## Text
//!
//! - [`truncate_text`] - Shorten long messages with an ellipsis
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x1234567890abcdef1234567890abcdef12345678";
//! assert_eq!(format_address(address, 6, 4), "0x1234...5678");
//! ```

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::{Address, U256};

use crate::dto::network::{network_info, SUPPORTED_NETWORKS};

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x1234567890abcdef1234567890abcdef12345678";
/// assert_eq!(format_address(addr, 6, 4), "0x1234...5678");
/// assert_eq!(format_address("0xabc", 6, 4), "0xabc");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len || !address.is_ascii() {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format an address the way the dashboard header shows it (`0x1234...cdef`).
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

/// Check whether a string is a valid EVM address.
///
/// All-lowercase and all-uppercase hex is accepted as-is; mixed case must
/// carry a valid EIP-55 checksum.
pub fn is_valid_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(address, None).is_ok()
    } else {
        true
    }
}

/// Format an integer amount in the token's smallest unit for display.
///
/// Falls back to a zero string of the requested precision when the value
/// cannot be converted (for example with more than 77 decimals).
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::U256;
/// use shared::utils::format_balance;
///
/// let wei = U256::from(1_500_000_000_000_000_000u128);
/// assert_eq!(format_balance(wei, 18, 4), "1.5000");
/// ```
pub fn format_balance(amount: U256, decimals: u8, precision: usize) -> String {
    format_units(amount, decimals)
        .ok()
        .and_then(|formatted| formatted.parse::<f64>().ok())
        .map(|value| format!("{:.prec$}", value, prec = precision))
        .unwrap_or_else(|| format!("{:.prec$}", 0.0, prec = precision))
}

/// Parse a user-entered decimal amount into the token's smallest unit.
pub fn parse_amount(value: &str, decimals: u8) -> Result<U256, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }
    if value.starts_with('-') {
        return Err("Amount must not be negative".to_string());
    }

    parse_units(value, decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| format!("Invalid amount '{}': {}", value, e))
}

/// Format a number with commas (e.g., 1234567.89 -> "1,234,567.89")
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.prec$}", value.abs(), prec = decimals);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (formatted.as_str(), None),
    };

    let mut result = String::new();
    for (i, ch) in integer_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    let mut grouped: String = result.chars().rev().collect();
    if value < 0.0 {
        grouped.insert(0, '-');
    }

    match decimal_part {
        Some(dec) => format!("{}.{}", grouped, dec),
        None => grouped,
    }
}

/// Shorten long text with a trailing ellipsis.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let head: String = text.chars().take(max_len).collect();
    format!("{}...", head)
}

fn explorer_base(chain_id: u64) -> &'static str {
    network_info(chain_id)
        .unwrap_or(&SUPPORTED_NETWORKS[0])
        .explorer
}

/// Block explorer link for a transaction; unknown chains fall back to mainnet.
pub fn explorer_tx_url(tx_hash: &str, chain_id: u64) -> String {
    format!("{}/tx/{}", explorer_base(chain_id), tx_hash)
}

/// Block explorer link for an address; unknown chains fall back to mainnet.
pub fn explorer_address_url(address: &str, chain_id: u64) -> String {
    format!("{}/address/{}", explorer_base(chain_id), address)
}

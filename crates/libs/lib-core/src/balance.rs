//! Native currency balance of the connected account.

use alloy_primitives::U256;
use serde_json::json;
use shared::dto::network::NATIVE_DECIMALS;
use shared::utils::format_balance;
use tracing::debug;

use crate::contract::{parse_address, parse_quantity, DISPLAY_PRECISION};
use crate::error::Result;
use crate::provider::{methods, WalletProvider};

/// Balance in wei plus its display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBalance {
    pub raw: U256,
    pub formatted: String,
}

impl NativeBalance {
    pub fn from_wei(raw: U256) -> Self {
        Self {
            raw,
            formatted: format_balance(raw, NATIVE_DECIMALS, DISPLAY_PRECISION),
        }
    }
}

/// Read `account`'s balance at the latest block.
pub async fn fetch_native_balance<P: WalletProvider + ?Sized>(
    provider: &P,
    account: &str,
) -> Result<NativeBalance> {
    let account = parse_address(account)?;
    let raw = provider
        .request(methods::GET_BALANCE, json!([account.to_string(), "latest"]))
        .await?;
    let balance = NativeBalance::from_wei(parse_quantity(&raw)?);
    debug!(%account, balance = %balance.formatted, "native balance loaded");
    Ok(balance)
}

//! # ERC-20 Contract Binding
//!
//! Typed calls against a token contract through the connected provider.
//! Reads go through `eth_call`; `transfer` needs a signer (the session
//! account) and returns a [`PendingTransaction`] that can be awaited until
//! the wallet's node reports a receipt.
//!
//! ABI encoding comes from the `sol!` interface below.

use std::rc::Rc;
use std::time::Duration;

use alloy_primitives::{hex, Address, U256};
use alloy_sol_types::{sol, SolCall};
use lib_utils::validation::validate_not_empty;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::dto::token::TokenInfo;
use shared::utils::{format_balance, is_valid_address};
use tracing::{debug, info, warn};

use crate::error::{Result, WalletError};
use crate::provider::{methods, WalletProvider};

sol! {
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Display precision used for token amounts.
pub const DISPLAY_PRECISION: usize = 4;

const DEFAULT_POLL_MS: u32 = 1_500;
const DEFAULT_MAX_POLLS: u32 = 120;

/// Parse and validate an address entered by the user or returned by the wallet.
pub fn parse_address(value: &str) -> Result<Address> {
    validate_not_empty(value, "Address").map_err(WalletError::InvalidInput)?;
    let value = value.trim();
    if !is_valid_address(value) {
        return Err(WalletError::InvalidInput(format!("Invalid address '{}'", value)));
    }
    value
        .parse::<Address>()
        .map_err(|e| WalletError::InvalidInput(format!("Invalid address '{}': {}", value, e)))
}

/// Handle to an ERC-20 contract.
pub struct Erc20<P: WalletProvider> {
    address: Address,
    provider: Rc<P>,
    signer: Option<Address>,
    poll_interval: Duration,
    max_polls: u32,
}

impl<P: WalletProvider> Erc20<P> {
    /// Read-only binding for the contract at `address`.
    pub fn new(address: &str, provider: Rc<P>) -> Result<Self> {
        Ok(Self {
            address: parse_address(address)?,
            provider,
            signer: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS as u64),
            max_polls: DEFAULT_MAX_POLLS,
        })
    }

    /// Attach the account that signs state-changing calls.
    pub fn with_signer(mut self, account: &str) -> Result<Self> {
        self.signer = Some(parse_address(account)?);
        Ok(self)
    }

    pub fn with_receipt_polling(mut self, poll_ms: u32, max_polls: u32) -> Self {
        self.poll_interval = Duration::from_millis(poll_ms as u64);
        self.max_polls = max_polls.max(1);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    // region: --- Reads

    pub async fn name(&self) -> Result<String> {
        self.call(IERC20::nameCall {}).await
    }

    pub async fn symbol(&self) -> Result<String> {
        self.call(IERC20::symbolCall {}).await
    }

    pub async fn decimals(&self) -> Result<u8> {
        self.call(IERC20::decimalsCall {}).await
    }

    pub async fn total_supply(&self) -> Result<U256> {
        self.call(IERC20::totalSupplyCall {}).await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.call(IERC20::balanceOfCall { owner }).await
    }

    /// Read name, symbol, decimals, supply and the owner's balance together.
    ///
    /// Amounts are formatted with the token's own decimals.
    pub async fn read_token_info(&self, owner: &str) -> Result<TokenInfo> {
        let owner = parse_address(owner)?;
        let (name, symbol, decimals, total_supply, balance) = futures::try_join!(
            self.name(),
            self.symbol(),
            self.decimals(),
            self.total_supply(),
            self.balance_of(owner),
        )?;

        debug!(token = %self.address, %symbol, decimals, "token info loaded");
        Ok(TokenInfo {
            name,
            symbol,
            decimals,
            total_supply: format_balance(total_supply, decimals, DISPLAY_PRECISION),
            balance: format_balance(balance, decimals, DISPLAY_PRECISION),
        })
    }

    async fn call<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let request = json!([
            {
                "to": self.address.to_string(),
                "data": hex::encode_prefixed(call.abi_encode()),
            },
            "latest"
        ]);
        let raw = self.provider.request(methods::CALL, request).await?;
        let bytes = decode_hex_bytes(&raw)?;

        C::abi_decode_returns(&bytes).map_err(|e| {
            WalletError::Decoding(format!("{} returned malformed data: {}", C::SIGNATURE, e))
        })
    }

    // endregion: --- Reads

    // region: --- Writes

    /// Submit `transfer(to, amount)` signed by the attached account.
    ///
    /// Gas is estimated first so that a reverting transfer fails before the
    /// wallet prompts.
    pub async fn transfer(&self, to: &str, amount: U256) -> Result<PendingTransaction<P>> {
        let from = self.signer.ok_or(WalletError::SignerRequired)?;
        let to = parse_address(to)?;
        if amount.is_zero() {
            return Err(WalletError::InvalidInput("Amount must be greater than zero".to_string()));
        }

        let data = hex::encode_prefixed(IERC20::transferCall { to, amount }.abi_encode());
        let mut tx = json!({
            "from": from.to_string(),
            "to": self.address.to_string(),
            "data": data,
        });

        let gas = self
            .provider
            .request(methods::ESTIMATE_GAS, json!([tx.clone()]))
            .await?;
        tx["gas"] = gas;

        info!(token = %self.address, %to, %amount, "submitting token transfer");
        let hash = self
            .provider
            .request(methods::SEND_TRANSACTION, json!([tx]))
            .await?;
        let hash = hash
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WalletError::Decoding(format!("transaction hash is not a string: {}", hash)))?;

        Ok(PendingTransaction {
            hash,
            provider: self.provider.clone(),
            poll_interval: self.poll_interval,
            max_polls: self.max_polls,
        })
    }

    // endregion: --- Writes
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub status: bool,
    pub block_number: Option<u64>,
}

/// Submitted transaction awaiting inclusion.
pub struct PendingTransaction<P: WalletProvider> {
    hash: String,
    provider: Rc<P>,
    poll_interval: Duration,
    max_polls: u32,
}

impl<P: WalletProvider> PendingTransaction<P> {
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Poll for the receipt until it appears or the poll budget runs out.
    ///
    /// A reverted transaction is reported as [`WalletError::Transaction`].
    pub async fn wait(self) -> Result<TransactionReceipt> {
        for attempt in 0..self.max_polls {
            let raw = self
                .provider
                .request(methods::GET_TRANSACTION_RECEIPT, json!([self.hash]))
                .await?;

            if !raw.is_null() {
                let receipt = parse_receipt(&self.hash, &raw)?;
                if !receipt.status {
                    warn!(hash = %self.hash, "transaction reverted");
                    return Err(WalletError::Transaction(format!(
                        "Transaction {} reverted",
                        self.hash
                    )));
                }
                info!(hash = %self.hash, block = ?receipt.block_number, "transaction confirmed");
                return Ok(receipt);
            }

            debug!(hash = %self.hash, attempt, "receipt not available yet");
            self.provider.pause(self.poll_interval).await;
        }

        Err(WalletError::Transaction(format!(
            "Transaction {} was not confirmed after {} checks",
            self.hash, self.max_polls
        )))
    }
}

// region: --- Response parsing

fn decode_hex_bytes(value: &Value) -> Result<Vec<u8>> {
    let raw = value
        .as_str()
        .ok_or_else(|| WalletError::Decoding(format!("expected hex data, got {}", value)))?;
    hex::decode(raw).map_err(|e| WalletError::Decoding(format!("invalid hex data: {}", e)))
}

/// Parse a hex quantity (`0x1a`) into a `U256`.
pub fn parse_quantity(value: &Value) -> Result<U256> {
    let raw = value
        .as_str()
        .ok_or_else(|| WalletError::Decoding(format!("expected hex quantity, got {}", value)))?;
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| WalletError::Decoding(format!("quantity '{}' is missing 0x", raw)))?;
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| WalletError::Decoding(format!("invalid quantity '{}': {}", raw, e)))
}

fn parse_receipt(hash: &str, raw: &Value) -> Result<TransactionReceipt> {
    let status = match raw.get("status").and_then(Value::as_str) {
        Some("0x1") => true,
        Some("0x0") => false,
        other => {
            return Err(WalletError::Decoding(format!(
                "unexpected receipt status {:?}",
                other
            )))
        }
    };
    let block_number = raw
        .get("blockNumber")
        .and_then(Value::as_str)
        .and_then(|b| b.strip_prefix("0x"))
        .and_then(|b| u64::from_str_radix(b, 16).ok());
    let transaction_hash = raw
        .get("transactionHash")
        .and_then(Value::as_str)
        .unwrap_or(hash)
        .to_string();

    Ok(TransactionReceipt {
        transaction_hash,
        status,
        block_number,
    })
}

// endregion: --- Response parsing

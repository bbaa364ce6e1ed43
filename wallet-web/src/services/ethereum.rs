//! Injected Ethereum Provider (`window.ethereum`) via wasm-bindgen
//!
//! [`BrowserProvider`] adapts the EIP-1193 object MetaMask (and compatible
//! wallets) inject into the page to [`lib_core::WalletProvider`].

use std::time::Duration;

use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect};
use lib_core::provider::parse_chain_id;
use lib_core::{EventSubscription, ProviderError, ProviderEvent, ProviderInfo, WalletProvider};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Wallet download page shown when no provider is injected.
pub const INSTALL_URL: &str = "https://metamask.io/download/";

#[wasm_bindgen(inline_js = "
export function getEthereum() {
    if (typeof window === 'undefined' || !window.ethereum) {
        return null;
    }
    // Several wallets installed: prefer MetaMask when it registered itself
    if (Array.isArray(window.ethereum.providers)) {
        const metamask = window.ethereum.providers.find((p) => p && p.isMetaMask);
        if (metamask) {
            return metamask;
        }
    }
    return window.ethereum;
}

export function walletName(provider) {
    if (!provider) {
        return 'Unknown';
    }
    if (provider.isBraveWallet) {
        return 'Brave Wallet';
    }
    if (provider.isCoinbaseWallet) {
        return 'Coinbase Wallet';
    }
    if (provider.isMetaMask) {
        return 'MetaMask';
    }
    return 'Injected Wallet';
}
")]
extern "C" {
    /// The injected provider object, if any
    fn getEthereum() -> Option<JsValue>;

    /// Display name derived from the provider's identity flags
    fn walletName(provider: &JsValue) -> String;
}

/// Reload the page; used as the chain-change hook.
pub fn reload_page() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().reload() {
            log::error!("Failed to reload page after chain change: {:?}", e);
        }
    }
}

/// EIP-1193 provider injected by a browser wallet.
pub struct BrowserProvider {
    ethereum: JsValue,
    info: ProviderInfo,
}

impl BrowserProvider {
    /// Wrap the injected provider; `None` when no wallet is installed.
    pub fn detect() -> Option<Self> {
        let ethereum = getEthereum()?;
        let is_metamask = get_prop(&ethereum, "isMetaMask")
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let info = ProviderInfo::new(walletName(&ethereum), is_metamask);
        log::info!("Detected wallet provider: {}", info.name);

        Some(Self { ethereum, info })
    }

    fn method(&self, name: &str) -> Result<Function, ProviderError> {
        get_prop(&self.ethereum, name)?
            .dyn_into::<Function>()
            .map_err(|_| ProviderError::internal(format!("window.ethereum.{} is unavailable", name)))
    }
}

#[async_trait(?Send)]
impl WalletProvider for BrowserProvider {
    fn info(&self) -> ProviderInfo {
        self.info.clone()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let request_fn = self.method("request")?;

        let payload = serde_json::json!({ "method": method, "params": params });
        let payload = to_js(&payload)?;

        let promise = request_fn
            .call1(&self.ethereum, &payload)
            .map_err(provider_error)?
            .dyn_into::<Promise>()
            .map_err(|_| ProviderError::internal("provider request did not return a Promise"))?;

        let result = JsFuture::from(promise).await.map_err(provider_error)?;
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| ProviderError::internal(format!("failed to decode {} response: {}", method, e)))
    }

    fn subscribe(&self) -> Result<EventSubscription, ProviderError> {
        let on = self.method("on")?;
        let (tx, rx) = async_channel::unbounded();

        let accounts_tx = tx.clone();
        let accounts_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let accounts: Vec<String> = if Array::is_array(&value) {
                Array::from(&value).iter().filter_map(|a| a.as_string()).collect()
            } else {
                Vec::new()
            };
            let _ = accounts_tx.try_send(ProviderEvent::AccountsChanged(accounts));
        });

        let chain_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let raw = match value.as_string() {
                Some(s) => Value::String(s),
                None => value.as_f64().map(|n| Value::from(n as u64)).unwrap_or(Value::Null),
            };
            match parse_chain_id(&raw) {
                Ok(chain_id) => {
                    let _ = tx.try_send(ProviderEvent::ChainChanged(chain_id));
                }
                Err(e) => log::warn!("Ignoring chainChanged with {}", e),
            }
        });

        on.call2(&self.ethereum, &"accountsChanged".into(), accounts_cb.as_ref().unchecked_ref())
            .map_err(provider_error)?;
        on.call2(&self.ethereum, &"chainChanged".into(), chain_cb.as_ref().unchecked_ref())
            .map_err(provider_error)?;

        let ethereum = self.ethereum.clone();
        let remove = self.method("removeListener").ok();
        Ok(EventSubscription::new(rx, move || {
            if let Some(remove) = remove {
                let _ = remove.call2(&ethereum, &"accountsChanged".into(), accounts_cb.as_ref().unchecked_ref());
                let _ = remove.call2(&ethereum, &"chainChanged".into(), chain_cb.as_ref().unchecked_ref());
            }
            log::debug!("Wallet listeners removed");
            drop(accounts_cb);
            drop(chain_cb);
        }))
    }

    async fn pause(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

// ============================================================================
// JS VALUE HELPERS
// ============================================================================

fn get_prop(target: &JsValue, key: &str) -> Result<JsValue, ProviderError> {
    Reflect::get(target, &JsValue::from_str(key))
        .map_err(|e| ProviderError::internal(format!("read provider property {} failed: {:?}", key, e)))
}

/// Plain JS objects rather than `Map`s, which is what wallets expect.
fn to_js(value: &Value) -> Result<JsValue, ProviderError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| ProviderError::internal(format!("failed to encode request: {}", e)))
}

/// Convert a rejected promise (`{ code, message, data }`) to a [`ProviderError`].
fn provider_error(err: JsValue) -> ProviderError {
    let code = get_prop(&err, "code")
        .ok()
        .and_then(|v| v.as_f64())
        .map(|c| c as i64)
        .unwrap_or(ProviderError::INTERNAL);
    let message = get_prop(&err, "message")
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    let data = get_prop(&err, "data")
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .and_then(|v| serde_wasm_bindgen::from_value(v).ok());

    ProviderError {
        code,
        message,
        data,
    }
}

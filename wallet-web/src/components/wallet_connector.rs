//! Wallet connect button and connected account panel

use leptos::prelude::*;
use lib_core::fetch_native_balance;
use shared::utils::{explorer_address_url, truncate_address};

use crate::state::wallet::use_wallet_context;

/// Connect / disconnect button shown in the navbar.
#[component]
pub fn WalletButton() -> impl IntoView {
    let wallet = use_wallet_context();

    view! {
        {move || {
            if let Some(account) = wallet.account() {
                view! {
                    <div style="display: flex; align-items: center; gap: 12px;">
                        <span class="address-chip" title=account.clone()>
                            {truncate_address(&account)}
                        </span>
                        <button class="btn btn-secondary" on:click=move |_| wallet.disconnect()>
                            "Disconnect"
                        </button>
                    </div>
                }
                .into_any()
            } else {
                view! {
                    <button
                        class="btn"
                        disabled=move || wallet.is_connecting()
                        on:click=move |_| wallet.connect()
                    >
                        {move || if wallet.is_connecting() { "Connecting..." } else { "Connect Wallet" }}
                    </button>
                }
                .into_any()
            }
        }}
    }
}

/// Connected account details with a periodically refreshed native balance.
#[component]
pub fn AccountPanel() -> impl IntoView {
    let wallet = use_wallet_context();
    let balance = RwSignal::new(None::<String>);
    let poll_generation = StoredValue::new(0u64);

    // Restart polling whenever the account or the epoch changes; older loops
    // see a newer generation and stop.
    Effect::new(move |_| {
        let account = wallet.account();
        wallet.epoch.track();

        let generation = poll_generation.get_value() + 1;
        poll_generation.set_value(generation);
        balance.set(None);

        let Some(account) = account else {
            return;
        };
        let manager = wallet.manager();
        let refresh_ms = manager.config().balance_refresh_ms;

        leptos::task::spawn_local(async move {
            while poll_generation.try_get_value() == Some(generation) {
                let Some(provider) = manager.provider() else {
                    break;
                };
                match fetch_native_balance(provider.as_ref(), &account).await {
                    Ok(native) => {
                        if poll_generation.try_get_value() == Some(generation) {
                            balance.set(Some(native.formatted));
                        }
                    }
                    Err(e) => log::warn!("Failed to fetch balance: {}", e),
                }
                gloo_timers::future::TimeoutFuture::new(refresh_ms).await;
            }
        });
    });

    let network_label = move || {
        wallet.session.with(|s| match s.network() {
            Some(network) => network.name.to_string(),
            None => s
                .chain_id()
                .map(|id| format!("Unknown network ({})", id))
                .unwrap_or_default(),
        })
    };

    let currency = move || {
        wallet
            .session
            .with(|s| s.network().map(|n| n.currency_symbol).unwrap_or("ETH"))
    };

    view! {
        <div class="card">
            <h2 class="card-title">"Account"</h2>

            <p class="label">"Wallet"</p>
            <p class="value">
                {move || wallet.session.with(|s| s.provider().map(|p| p.name.clone()).unwrap_or_default())}
            </p>

            <p class="label">"Address"</p>
            <p class="value mono" style="word-break: break-all;">
                {move || {
                    let account = wallet.account().unwrap_or_default();
                    let href = explorer_address_url(&account, wallet.chain_id().unwrap_or(1));
                    view! {
                        <a href=href target="_blank" rel="noopener noreferrer">{account}</a>
                    }
                }}
            </p>

            <p class="label">"Network"</p>
            <p class="value">{network_label}</p>

            <p class="label">"Balance"</p>
            <p class="value">
                {move || match balance.get() {
                    Some(amount) => format!("{} {}", amount, currency()),
                    None => "Loading...".to_string(),
                }}
            </p>
        </div>
    }
}

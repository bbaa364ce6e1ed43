//! ERC-20 token panel: read token info and transfer tokens.

use leptos::prelude::*;
use lib_core::WalletError;
use shared::dto::token::{known_tokens, TokenInfo, TransactionStatus};
use shared::utils::{explorer_tx_url, format_number, parse_amount, truncate_address};

use crate::state::wallet::use_wallet_context;

/// Group the integer digits of a formatted amount; unparsable input is kept.
fn grouped(amount: &str) -> String {
    let decimals = amount.split_once('.').map_or(0, |(_, frac)| frac.len());
    amount
        .parse::<f64>()
        .map(|value| format_number(value, decimals))
        .unwrap_or_else(|_| amount.to_string())
}

fn transfer_error(error: &WalletError) -> TransactionStatus {
    let message = match error {
        WalletError::UserRejected(_) => "Transaction rejected by user".to_string(),
        other => format!("Transaction failed: {}", other.user_message()),
    };
    TransactionStatus::Error { message }
}

#[component]
pub fn ContractInteraction() -> impl IntoView {
    let wallet = use_wallet_context();

    let token_address = RwSignal::new(String::new());
    let token_info = RwSignal::new(None::<TokenInfo>);
    let loading = RwSignal::new(false);
    let recipient = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());
    let status = RwSignal::new(TransactionStatus::Idle);

    // Token data belongs to one account on one chain
    Effect::new(move |_| {
        wallet.epoch.track();
        wallet.account();
        token_info.set(None);
        status.set(TransactionStatus::Idle);
    });

    let load_token = move || {
        let Some(account) = wallet.account() else {
            return;
        };
        let address = token_address.get_untracked();
        let manager = wallet.manager();
        let scope = manager.store().snapshot();
        loading.set(true);

        leptos::task::spawn_local(async move {
            let result = match manager.token(&address) {
                Ok(token) => token.read_token_info(&account).await,
                Err(e) => Err(e),
            };
            if !scope.same_scope(&manager.store().snapshot()) {
                log::debug!("Dropping token info loaded for a previous account or chain");
                loading.set(false);
                return;
            }
            match result {
                Ok(info) => token_info.set(Some(info)),
                Err(e) => {
                    token_info.set(None);
                    wallet.report(&e);
                }
            }
            loading.set(false);
        });
    };

    let transfer = move || {
        let Some(chain_id) = wallet.chain_id() else {
            return;
        };
        let address = token_address.get_untracked();
        let to = recipient.get_untracked();
        let value = amount.get_untracked();
        let decimals = token_info
            .with_untracked(|info| info.as_ref().map(|i| i.decimals))
            .unwrap_or(wallet.manager().config().default_token_decimals);
        let manager = wallet.manager();
        let scope = manager.store().snapshot();
        let in_scope = {
            let manager = manager.clone();
            move || scope.same_scope(&manager.store().snapshot())
        };

        status.set(TransactionStatus::pending("Preparing transaction..."));
        leptos::task::spawn_local(async move {
            let amount_units = match parse_amount(&value, decimals) {
                Ok(units) => units,
                Err(message) => {
                    status.set(TransactionStatus::Error { message });
                    return;
                }
            };
            let token = match manager.token(&address) {
                Ok(token) => token,
                Err(e) => {
                    status.set(transfer_error(&e));
                    return;
                }
            };

            status.set(TransactionStatus::pending("Sending transaction..."));
            let pending = match token.transfer(&to, amount_units).await {
                Ok(pending) => pending,
                Err(e) => {
                    if in_scope() {
                        status.set(transfer_error(&e));
                    }
                    return;
                }
            };
            if !in_scope() {
                log::info!("Transfer {} sent before an account or chain change", pending.hash());
                return;
            }

            let hash = pending.hash().to_string();
            log::info!("Transfer submitted: {} on chain {}", hash, chain_id);
            status.set(TransactionStatus::Pending {
                message: "Waiting for confirmation...".to_string(),
                hash: Some(hash.clone()),
            });

            let receipt = pending.wait().await;
            if !in_scope() {
                return;
            }
            match receipt {
                Ok(_) => {
                    status.set(TransactionStatus::Success {
                        message: "Transfer confirmed".to_string(),
                        hash,
                    });
                    amount.set(String::new());
                    if let Some(account) = manager.session().account() {
                        if let Ok(info) = token.read_token_info(account).await {
                            if in_scope() {
                                token_info.set(Some(info));
                            }
                        }
                    }
                }
                Err(e) => status.set(transfer_error(&e)),
            }
        });
    };

    let suggestions = move || wallet.chain_id().map(known_tokens).unwrap_or_default();

    view! {
        <div class="card">
            <h2 class="card-title">"Token Contract"</h2>

            <label class="label">"Token address"</label>
            <input
                class="input mono"
                placeholder="0x..."
                prop:value=move || token_address.get()
                on:input=move |ev| token_address.set(event_target_value(&ev))
            />
            <div style="display: flex; gap: 8px; margin: 8px 0;">
                {move || {
                    suggestions()
                        .into_iter()
                        .map(|(name, address)| {
                            view! {
                                <button class="btn btn-small" on:click=move |_| token_address.set(address.to_string())>
                                    {name}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <button
                class="btn"
                disabled=move || loading.get() || token_address.with(|a| a.trim().is_empty())
                on:click=move |_| load_token()
            >
                {move || if loading.get() { "Loading..." } else { "Load Token" }}
            </button>

            {move || {
                token_info
                    .get()
                    .map(|info| {
                        view! {
                            <div class="token-info">
                                <p class="label">"Token"</p>
                                <p class="value">{format!("{} ({})", info.name, info.symbol)}</p>
                                <p class="label">"Decimals"</p>
                                <p class="value">{info.decimals.to_string()}</p>
                                <p class="label">"Total supply"</p>
                                <p class="value">{grouped(&info.total_supply)}</p>
                                <p class="label">"Your balance"</p>
                                <p class="value">{format!("{} {}", grouped(&info.balance), info.symbol)}</p>
                            </div>
                        }
                    })
            }}

            <h3 style="margin-top: var(--spacing-lg);">"Transfer"</h3>
            <label class="label">"Recipient"</label>
            <input
                class="input mono"
                placeholder="0x..."
                prop:value=move || recipient.get()
                on:input=move |ev| recipient.set(event_target_value(&ev))
            />
            <label class="label">"Amount"</label>
            <input
                class="input"
                placeholder="0.0"
                prop:value=move || amount.get()
                on:input=move |ev| amount.set(event_target_value(&ev))
            />
            <button
                class="btn"
                disabled=move || {
                    status.with(|s| s.is_pending())
                        || token_address.with(|a| a.trim().is_empty())
                        || recipient.with(|r| r.trim().is_empty())
                        || amount.with(|a| a.trim().is_empty())
                }
                on:click=move |_| transfer()
            >
                "Send Tokens"
            </button>

            {move || {
                let current = status.get();
                let class = match &current {
                    TransactionStatus::Idle => return None,
                    TransactionStatus::Pending { .. } => "tx-status tx-pending",
                    TransactionStatus::Success { .. } => "tx-status tx-success",
                    TransactionStatus::Error { .. } => "tx-status tx-error",
                };
                let message = current.message().unwrap_or_default().to_string();
                let link = current.hash().map(|hash| {
                    let href = explorer_tx_url(hash, wallet.chain_id().unwrap_or(1));
                    let label = truncate_address(hash);
                    view! {
                        <a href=href target="_blank" rel="noopener noreferrer">{label}</a>
                    }
                });
                Some(view! {
                    <div class=class>
                        <p>{message}</p>
                        {link}
                    </div>
                })
            }}
        </div>
    }
}

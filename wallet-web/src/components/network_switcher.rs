//! Network selector and unsupported-network warning

use leptos::prelude::*;
use lib_core::{NetworkStatus, WalletError};
use shared::dto::network::SUPPORTED_NETWORKS;

use crate::state::wallet::use_wallet_context;

#[component]
pub fn NetworkSwitcher() -> impl IntoView {
    let wallet = use_wallet_context();
    let status = move || wallet.session.with(|s| s.network_status());
    let selected = move || wallet.chain_id().map(|id| id.to_string()).unwrap_or_default();

    let on_change = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        match value.parse::<u64>() {
            Ok(chain_id) if Some(chain_id) != wallet.chain_id() => wallet.switch_network(chain_id),
            Ok(_) => {}
            Err(_) => log::warn!("Ignoring network selection '{}'", value),
        }
    };

    view! {
        <div class="card">
            <h2 class="card-title">"Network"</h2>

            {move || match status() {
                NetworkStatus::Unsupported(chain_id) => {
                    let message = WalletError::NetworkUnsupported(chain_id).user_message();
                    view! { <p class="warning">{message}</p> }.into_any()
                }
                NetworkStatus::Supported(network) => view! {
                    <p class="value">{format!("{} (Chain ID: {})", network.name, network.chain_id)}</p>
                }
                .into_any(),
                NetworkStatus::Unknown => view! { <p class="value">"Not connected"</p> }.into_any(),
            }}

            <select class="select" prop:value=selected on:change=on_change>
                <option value="" disabled=true>"Select network"</option>
                {SUPPORTED_NETWORKS
                    .iter()
                    .map(|network| {
                        view! {
                            <option value=network.chain_id.to_string()>
                                {format!("{} ({})", network.name, network.currency_symbol)}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

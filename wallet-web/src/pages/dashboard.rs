//! Dashboard Page - connect prompt, or account, network and token panels

use leptos::prelude::*;

use crate::components::{AccountPanel, ContractInteraction, NetworkSwitcher};
use crate::state::wallet::use_wallet_context;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let wallet = use_wallet_context();

    view! {
        <div class="app-container" style="max-width: 1200px; margin: 0 auto; padding: 48px 24px;">
            <Show
                when=move || wallet.is_connected()
                fallback=move || view! {
                    <div class="card" style="max-width: 500px; margin: 0 auto; text-align: center;">
                        <h1 class="card-title">"Connect Your Wallet"</h1>
                        <p style="color: var(--text-secondary); margin-bottom: var(--spacing-lg);">
                            "Connect MetaMask to view your balance, switch networks and interact with ERC-20 tokens."
                        </p>
                        <button
                            class="btn"
                            disabled=move || wallet.is_connecting()
                            on:click=move |_| wallet.connect()
                        >
                            {move || if wallet.is_connecting() { "Connecting..." } else { "Connect Wallet" }}
                        </button>
                    </div>
                }
            >
                <div class="dashboard-grid">
                    <AccountPanel/>
                    <NetworkSwitcher/>
                    <ContractInteraction/>
                </div>
            </Show>
        </div>
    }
}

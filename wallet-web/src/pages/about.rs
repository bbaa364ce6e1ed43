//! About Page

use leptos::prelude::*;
use shared::dto::network::SUPPORTED_NETWORKS;

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="app-container" style="display: flex; justify-content: center; padding: 48px 24px;">
            <div class="about-container">
                <div class="card">
                    <h1 class="card-title" style="text-align: center; margin-bottom: 32px;">
                        "About Wallet Connect"
                    </h1>

                    <div style="line-height: 1.8; font-size: 16px; color: var(--text-secondary);">
                        <p style="margin-bottom: 24px;">
                            "A browser dashboard for EVM wallets. It connects to MetaMask or any wallet that
                            injects an EIP-1193 provider, follows account and network changes made in the
                            wallet, and talks to ERC-20 contracts through the connected account."
                        </p>

                        <h2 style="font-size: 24px; margin: 32px 0 16px;">"Features"</h2>
                        <ul style="margin-left: 24px; margin-bottom: 24px;">
                            <li>"Connect and restore a previously authorized wallet session"</li>
                            <li>"Native balance of the connected account, refreshed periodically"</li>
                            <li>"Network switching, adding the network to the wallet when needed"</li>
                            <li>"ERC-20 token details and transfers with confirmation tracking"</li>
                        </ul>

                        <h2 style="font-size: 24px; margin: 32px 0 16px;">"Supported Networks"</h2>
                        <ul style="margin-left: 24px;">
                            {SUPPORTED_NETWORKS
                                .iter()
                                .map(|n| view! { <li>{format!("{} (Chain ID: {})", n.name, n.chain_id)}</li> })
                                .collect_view()}
                        </ul>
                    </div>
                </div>
            </div>
        </div>
    }
}

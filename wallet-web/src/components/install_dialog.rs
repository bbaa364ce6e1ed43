//! Shown when connect is attempted without an injected wallet.

use leptos::prelude::*;

use crate::services::ethereum::INSTALL_URL;
use crate::state::wallet::use_wallet_context;

#[component]
pub fn InstallDialog() -> impl IntoView {
    let wallet = use_wallet_context();
    let close = move |_| wallet.install_dialog.set(false);

    view! {
        <Show when=move || wallet.install_dialog.get()>
            <div class="modal-backdrop" on:click=close>
                <div class="card modal" on:click=|ev| ev.stop_propagation()>
                    <h2 class="card-title">"MetaMask Not Installed"</h2>
                    <p style="color: var(--text-secondary); margin-bottom: var(--spacing-lg);">
                        "A browser wallet is required to connect. Install MetaMask, then reload this page."
                    </p>
                    <div style="display: flex; gap: 12px; justify-content: flex-end;">
                        <button class="btn btn-secondary" on:click=close>"Close"</button>
                        <a class="btn" href=INSTALL_URL target="_blank" rel="noopener noreferrer">
                            "Install MetaMask"
                        </a>
                    </div>
                </div>
            </div>
        </Show>
    }
}

//! Navigation Bar Component

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::WalletButton;

#[component]
pub fn Navbar() -> impl IntoView {
    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: space-between; align-items: center;">
                <div style="display: flex; align-items: center; gap: 24px;">
                    <A href="/" attr:class="nav-link-clean">
                        <span class="nav-title">"Wallet Connect"</span>
                    </A>
                    <A href="/about" attr:class="nav-link">"About"</A>
                </div>
                <WalletButton/>
            </div>
        </nav>
    }
}

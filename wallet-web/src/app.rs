//! Wallet Connect Web App - Leptos Frontend

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes, A},
    path,
};

use crate::components::{InstallDialog, Navbar, Toasts};
use crate::pages::{AboutPage, DashboardPage};
use crate::state::notifications::provide_notifications;
use crate::state::wallet::provide_wallet_context;

#[component]
pub fn App() -> impl IntoView {
    let notifications = provide_notifications();
    provide_wallet_context(notifications);

    Effect::new(move |_| hide_loading_screen());

    view! {
        <Router>
            <div class="app-container">
                <Navbar/>
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("/") view=DashboardPage/>
                    <Route path=path!("/about") view=AboutPage/>
                </Routes>
                <InstallDialog/>
                <Toasts/>
            </div>
        </Router>
    }
}

/// Hide the static loading screen from index.html once the app is mounted.
fn hide_loading_screen() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("No document available");
        return;
    };

    match document.get_element_by_id("leptos-loading") {
        Some(loading) => {
            if let Err(e) = loading.set_attribute("style", "display: none !important;") {
                log::error!("Failed to hide loading screen: {:?}", e);
            }
        }
        None => log::debug!("Loading element not found"),
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="app-container" style="display: flex; justify-content: center; align-items: center; min-height: calc(100vh - 60px);">
            <div class="card" style="max-width: 500px; text-align: center;">
                <h1 style="margin-bottom: 16px; font-size: 32px; font-weight: 700;">"404 - Page Not Found"</h1>
                <p style="color: var(--text-secondary); margin-bottom: 24px;">"The page you're looking for doesn't exist."</p>
                <A href="/">
                    <span class="btn" style="margin-top: 20px; display: inline-block;">
                        "Go to Dashboard"
                    </span>
                </A>
            </div>
        </div>
    }
}

//! Wallet Connect Dashboard
//!
//! Browser front end for the wallet connection core in `lib-core`.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod app;
mod components;
mod pages;
mod services;
mod state;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Routes `log` records and `tracing` events from lib-core to the console
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Wallet dashboard starting...");

    // No process environment in the browser: the defaults apply unless overridden
    if let Err(e) = lib_core::init_config() {
        log::warn!("Using default wallet configuration: {}", e);
    }

    leptos::mount::mount_to_body(|| view! { <App/> });
}

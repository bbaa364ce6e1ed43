//! UI Components

pub mod contract_interaction;
pub mod install_dialog;
pub mod navbar;
pub mod network_switcher;
pub mod toasts;
pub mod wallet_connector;

pub use contract_interaction::ContractInteraction;
pub use install_dialog::InstallDialog;
pub use navbar::Navbar;
pub use network_switcher::NetworkSwitcher;
pub use toasts::Toasts;
pub use wallet_connector::{AccountPanel, WalletButton};

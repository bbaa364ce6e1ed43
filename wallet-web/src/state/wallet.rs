//! Wallet state management
//!
//! The [`ConnectionManager`] owns the session; this context mirrors its store
//! into signals so components re-render on every snapshot.

use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use leptos::prelude::*;
use lib_core::{core_config, ConnectionManager, Session, SessionStore, WalletError};

use crate::services::ethereum::{reload_page, BrowserProvider};
use crate::state::notifications::Notifications;

pub type Manager = ConnectionManager<BrowserProvider>;

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub session: RwSignal<Session>,
    /// Bumped whenever chain-dependent data must be re-fetched.
    pub epoch: RwSignal<u64>,
    /// Shown when connect is attempted without an injected wallet.
    pub install_dialog: RwSignal<bool>,
    pub notifications: Notifications,
    manager: StoredValue<Rc<Manager>, LocalStorage>,
}

impl WalletContext {
    fn new(manager: Rc<Manager>, notifications: Notifications) -> Self {
        Self {
            session: RwSignal::new(manager.session()),
            epoch: RwSignal::new(manager.store().epoch()),
            install_dialog: RwSignal::new(false),
            notifications,
            manager: StoredValue::new_local(manager),
        }
    }

    pub fn manager(&self) -> Rc<Manager> {
        self.manager.get_value()
    }

    pub fn is_connected(&self) -> bool {
        self.session.with(|s| s.is_connected())
    }

    pub fn is_connecting(&self) -> bool {
        self.session.with(|s| s.is_connecting())
    }

    pub fn account(&self) -> Option<String> {
        self.session.with(|s| s.account().map(str::to_string))
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.session.with(|s| s.chain_id())
    }

    /// Prompt for account access; errors are reported as notifications.
    pub fn connect(&self) {
        let manager = self.manager();
        if !manager.is_provider_installed() {
            self.install_dialog.set(true);
            return;
        }

        let notifications = self.notifications;
        leptos::task::spawn_local(async move {
            match manager.connect().await {
                Ok(session) => {
                    if let Some(account) = session.account() {
                        notifications.success(format!(
                            "Connected {}",
                            shared::utils::truncate_address(account)
                        ));
                    }
                }
                Err(e) => notifications.error(&e),
            }
        });
    }

    pub fn disconnect(&self) {
        self.manager().disconnect();
    }

    /// Ask the wallet to switch to `chain_id`.
    pub fn switch_network(&self, chain_id: u64) {
        let manager = self.manager();
        let notifications = self.notifications;
        leptos::task::spawn_local(async move {
            if let Err(e) = manager.switch_network(chain_id).await {
                notifications.error(&e);
            }
        });
    }

    pub fn report(&self, error: &WalletError) {
        self.notifications.error(error);
    }
}

/// Build the manager, mirror its store into signals, restore an authorized
/// session and start applying wallet events.
pub fn provide_wallet_context(notifications: Notifications) -> WalletContext {
    let store = SessionStore::new();
    let manager = ConnectionManager::new(BrowserProvider::detect(), store.clone())
        .with_config(core_config().clone())
        .on_reload(reload_page);
    let context = WalletContext::new(Rc::new(manager), notifications);
    provide_context(context);

    let updates = store.subscribe();
    let (abort_mirror, registration) = AbortHandle::new_pair();
    let mirror = Abortable::new(
        async move {
            while let Ok(snapshot) = updates.recv().await {
                context.session.set(snapshot.session);
                context.epoch.set(snapshot.epoch);
            }
        },
        registration,
    );
    leptos::task::spawn_local(async move {
        let _ = mirror.await;
    });
    // Dropping the receiver releases the store subscriber.
    on_cleanup(move || abort_mirror.abort());

    let manager = context.manager();
    if manager.is_provider_installed() {
        let (abort, registration) = AbortHandle::new_pair();
        let events = Abortable::new(
            async move {
                let events = match manager.subscribe_events() {
                    Ok(events) => Some(events),
                    Err(e) => {
                        log::error!("Failed to subscribe to wallet events: {}", e);
                        None
                    }
                };
                if let Err(e) = manager.restore_session().await {
                    log::warn!("Could not restore wallet session: {}", e);
                }
                if let Some(events) = events {
                    manager.run_events(events).await;
                }
            },
            registration,
        );
        leptos::task::spawn_local(async move {
            let _ = events.await;
        });

        // Aborting drops the subscription, which removes the listeners.
        on_cleanup(move || abort.abort());
    } else {
        log::warn!("No injected wallet provider found");
    }

    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}

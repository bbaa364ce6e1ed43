//! # Connection Manager
//!
//! Mediates between the injected wallet and the UI. Owns the wallet provider,
//! writes every session transition into the [`SessionStore`], and applies the
//! wallet's push notifications in the order they arrive.
//!
//! ## State Machine
//!
//! ```text
//!                 connect()                  ok
//! Disconnected ─────────────► Connecting ─────────► Connected ◄─┐
//!      ▲                           │                    │  │    │ chainChanged /
//!      └───────── any failure ─────┘                    │  └────┘ accountsChanged([a, ..])
//!      ▲                                                │
//!      └──────── disconnect() / accountsChanged([]) ────┘
//! ```
//!
//! ## Re-entrancy
//!
//! `connect()` and `switch_network()` share one in-flight slot: while either
//! waits on the wallet, a second call fails fast with
//! [`WalletError::OperationInFlight`].
//!
//! ## Startup
//!
//! ```rust,no_run
//! # async fn run<P: lib_core::provider::WalletProvider>(manager: lib_core::ConnectionManager<P>) {
//! let events = manager.subscribe_events().ok();
//! let _ = manager.restore_session().await;
//! if let Some(events) = events {
//!     manager.run_events(events).await;
//! }
//! # }
//! ```

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;
use shared::dto::network::{is_network_supported, network_info, NetworkInfo, SwitchChainParams};
use tracing::{debug, error, info, warn};

use crate::config::{ChainChangePolicy, WalletConfig};
use crate::contract::Erc20;
use crate::error::{ProviderError, Result, WalletError};
use crate::provider::{methods, parse_accounts, parse_chain_id, EventSubscription, ProviderEvent, WalletProvider};
use crate::session::{ConnectionState, Session};
use crate::store::SessionStore;

#[cfg(test)]
mod tests;

/// Operations that wait on a wallet prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Connect,
    SwitchNetwork,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Connect => "connect",
            Operation::SwitchNetwork => "network switch",
        }
    }
}

/// Clears the in-flight slot when the operation finishes, however it finishes.
struct InFlightGuard<'a> {
    slot: &'a Cell<Option<Operation>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.slot.set(None);
    }
}

/// Connection state manager.
pub struct ConnectionManager<P: WalletProvider> {
    provider: Option<Rc<P>>,
    store: SessionStore,
    config: WalletConfig,
    in_flight: Cell<Option<Operation>>,
    reload: Box<dyn Fn()>,
}

impl<P: WalletProvider> ConnectionManager<P> {
    /// Create a manager; `provider` is `None` when no wallet is injected.
    pub fn new(provider: Option<P>, store: SessionStore) -> Self {
        Self {
            provider: provider.map(Rc::new),
            store,
            config: WalletConfig::default(),
            in_flight: Cell::new(None),
            reload: Box::new(|| warn!("chain changed but no reload hook is installed")),
        }
    }

    pub fn with_config(mut self, config: WalletConfig) -> Self {
        self.config = config;
        self
    }

    /// Install the hook used by [`ChainChangePolicy::Reload`].
    pub fn on_reload(mut self, reload: impl Fn() + 'static) -> Self {
        self.reload = Box::new(reload);
        self
    }

    // region: --- Accessors

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn session(&self) -> Session {
        self.store.session()
    }

    pub fn is_provider_installed(&self) -> bool {
        self.provider.is_some()
    }

    /// Provider of the active connection; `None` unless connected.
    pub fn provider(&self) -> Option<Rc<P>> {
        if self.store.session().is_connected() {
            self.provider.clone()
        } else {
            None
        }
    }

    /// Metadata of the active chain.
    ///
    /// Fails with [`WalletError::NetworkUnsupported`] when the chain is not in
    /// the supported table; the session itself is left untouched.
    pub fn current_network(&self) -> Result<Option<&'static NetworkInfo>> {
        match self.store.session().chain_id() {
            None => Ok(None),
            Some(chain_id) => network_info(chain_id)
                .map(Some)
                .ok_or(WalletError::NetworkUnsupported(chain_id)),
        }
    }

    // endregion: --- Accessors

    // region: --- Operations

    /// Ask the wallet for account access and populate the session.
    ///
    /// Returns the current session unchanged when already connected.
    pub async fn connect(&self) -> Result<Session> {
        let provider = self.require_provider()?;
        let _guard = self.begin(Operation::Connect)?;

        let current = self.store.session();
        if current.is_connected() {
            debug!(account = ?current.account(), "connect requested while already connected");
            return Ok(current);
        }

        self.store.replace(Session::connecting());
        info!("requesting wallet account access");

        match self.load_session(provider, methods::REQUEST_ACCOUNTS).await {
            Ok(session) => {
                info!(account = ?session.account(), chain_id = ?session.chain_id(), "wallet connected");
                self.store.replace(session.clone());
                Ok(session)
            }
            Err(err) => {
                match &err {
                    WalletError::UserRejected(_) => warn!("wallet connection rejected by user"),
                    other => error!(error = %other, "wallet connection failed"),
                }
                self.store.replace(Session::disconnected());
                Err(err)
            }
        }
    }

    /// Clear the session. Provider-side permissions stay granted.
    pub fn disconnect(&self) {
        if self.store.replace(Session::disconnected()) {
            info!("wallet disconnected");
        }
    }

    /// Ask the wallet to switch chains, registering the chain first if the
    /// wallet does not know it.
    ///
    /// The session's chain id is updated by the resulting `chainChanged`
    /// notification, not here.
    pub async fn switch_network(&self, chain_id: u64) -> Result<()> {
        let provider = self.require_provider()?;
        let _guard = self.begin(Operation::SwitchNetwork)?;

        info!(chain_id, "requesting network switch");
        match self.request_switch(provider, chain_id).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_unrecognized_chain() => {
                let network =
                    network_info(chain_id).ok_or(WalletError::NetworkUnsupported(chain_id))?;

                warn!(chain_id, name = network.name, "chain unknown to wallet, registering it");
                provider
                    .request(methods::ADD_CHAIN, json!([network.add_chain_params()]))
                    .await
                    .map_err(|e| {
                        error!(chain_id, error = %e, "failed to add network to wallet");
                        WalletError::from(e)
                    })?;

                self.request_switch(provider, chain_id).await.map_err(|e| {
                    if e.is_unrecognized_chain() {
                        WalletError::UnrecognizedChain(chain_id)
                    } else {
                        WalletError::from(e)
                    }
                })
            }
            Err(err) => {
                error!(chain_id, error = %err, "network switch failed");
                Err(err.into())
            }
        }
    }

    /// Populate the session from accounts the wallet already authorized,
    /// without prompting the user.
    ///
    /// Returns `Ok(None)` when no wallet is installed, nothing is authorized,
    /// or the session is no longer disconnected.
    pub async fn restore_session(&self) -> Result<Option<Session>> {
        let Some(provider) = self.provider.as_deref() else {
            debug!("no wallet provider, skipping session restore");
            return Ok(None);
        };

        let session = match self.load_session(provider, methods::ACCOUNTS).await {
            Ok(session) => session,
            Err(WalletError::NoAccountsReturned) => {
                debug!("no previously authorized accounts");
                return Ok(None);
            }
            Err(err) => {
                error!(error = %err, "failed to check existing wallet connection");
                return Err(err);
            }
        };

        if self.store.session().state() != ConnectionState::Disconnected {
            debug!("session changed while restoring, keeping it");
            return Ok(None);
        }

        info!(account = ?session.account(), "restored previously authorized wallet session");
        self.store.replace(session.clone());
        Ok(Some(session))
    }

    /// ERC-20 binding for `address`.
    ///
    /// Signs with the session account when connected; read-only otherwise.
    pub fn token(&self, address: &str) -> Result<Erc20<P>> {
        let provider = self.provider.clone().ok_or(WalletError::ProviderMissing)?;
        let token = Erc20::new(address, provider)?
            .with_receipt_polling(self.config.receipt_poll_ms, self.config.receipt_max_polls);

        match self.store.session().account() {
            Some(account) => token.with_signer(account),
            None => Ok(token),
        }
    }

    // endregion: --- Operations

    // region: --- Provider events

    /// Register for the wallet's push notifications.
    pub fn subscribe_events(&self) -> Result<EventSubscription> {
        let provider = self.require_provider()?;
        provider.subscribe().map_err(WalletError::from)
    }

    /// Drain notifications until the provider closes the stream.
    pub async fn run_events(&self, events: EventSubscription) {
        while let Some(event) = events.next().await {
            self.handle_event(event).await;
        }
        info!("wallet event stream closed");
    }

    /// Apply a single wallet notification.
    pub async fn handle_event(&self, event: ProviderEvent) {
        debug!(?event, "wallet event");
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.on_accounts_changed(accounts).await,
            ProviderEvent::ChainChanged(chain_id) => self.on_chain_changed(chain_id),
        }
    }

    async fn on_accounts_changed(&self, accounts: Vec<String>) {
        let Some(account) = accounts.into_iter().next() else {
            info!("wallet exposed no accounts");
            self.disconnect();
            return;
        };

        let current = self.store.session();
        if let Some(next) = current.with_account(account.clone()) {
            info!(account = %account, "wallet account changed");
            self.store.replace(next);
            return;
        }

        debug!(account = %account, "accounts changed while disconnected, ignored");
    }

    fn on_chain_changed(&self, chain_id: u64) {
        if !is_network_supported(chain_id) {
            warn!(chain_id, "wallet switched to an unsupported network");
        }

        let current = self.store.session();
        let next = current.with_chain(chain_id).unwrap_or(current);
        let epoch = self.store.replace_and_resync(next);
        info!(chain_id, epoch, policy = %self.config.chain_change_policy, "wallet chain changed");

        if self.config.chain_change_policy == ChainChangePolicy::Reload {
            (self.reload)();
        }
    }

    // endregion: --- Provider events

    // region: --- Helpers

    fn require_provider(&self) -> Result<&P> {
        self.provider.as_deref().ok_or(WalletError::ProviderMissing)
    }

    fn begin(&self, operation: Operation) -> Result<InFlightGuard<'_>> {
        if let Some(pending) = self.in_flight.get() {
            warn!(requested = operation.name(), pending = pending.name(), "wallet request already in progress");
            return Err(WalletError::OperationInFlight(pending.name()));
        }
        self.in_flight.set(Some(operation));
        Ok(InFlightGuard {
            slot: &self.in_flight,
        })
    }

    async fn load_session(&self, provider: &P, accounts_method: &str) -> Result<Session> {
        debug!(method = accounts_method, "wallet request");
        let accounts = provider.request(accounts_method, json!([])).await?;
        let account = parse_accounts(&accounts)?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccountsReturned)?;

        let chain_id = self.fetch_chain_id(provider).await?;
        if !is_network_supported(chain_id) {
            warn!(chain_id, "connected to an unsupported network");
        }

        Ok(Session::connected(account, chain_id, provider.info()))
    }

    async fn fetch_chain_id(&self, provider: &P) -> Result<u64> {
        debug!(method = methods::CHAIN_ID, "wallet request");
        let raw = provider.request(methods::CHAIN_ID, json!([])).await?;
        Ok(parse_chain_id(&raw)?)
    }

    async fn request_switch(&self, provider: &P, chain_id: u64) -> std::result::Result<(), ProviderError> {
        debug!(method = methods::SWITCH_CHAIN, chain_id, "wallet request");
        provider
            .request(methods::SWITCH_CHAIN, json!([SwitchChainParams::new(chain_id)]))
            .await
            .map(|_| ())
    }

    // endregion: --- Helpers
}

//! # Session Store
//!
//! Owned container for the single [`Session`], handed to every consumer that
//! needs it. Consumers call [`SessionStore::subscribe`] and receive a
//! [`Snapshot`] after every change, starting with the current one.
//!
//! Besides the session the store keeps an `epoch` counter. It is bumped when
//! chain-dependent state (balances, contract reads) must be re-fetched, so
//! consumers key their lookups on it.

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::session::Session;

/// Session plus the epoch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub session: Session,
    pub epoch: u64,
}

impl Snapshot {
    /// Whether data loaded under `self` still belongs to `current`: same
    /// account, same chain and no resync in between.
    pub fn same_scope(&self, current: &Snapshot) -> bool {
        self.epoch == current.epoch
            && self.session.account() == current.session.account()
            && self.session.chain_id() == current.session.chain_id()
    }
}

#[derive(Default)]
struct StoreInner {
    current: Snapshot,
    subscribers: Vec<Sender<Snapshot>>,
}

/// Shared session container with subscribe/notify semantics.
///
/// Cloning yields another handle to the same store.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Session {
        self.inner.lock().current.session.clone()
    }

    pub fn epoch(&self) -> u64 {
        self.inner.lock().current.epoch
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().current.clone()
    }

    /// Swap in a new session. Subscribers are notified only if it differs.
    ///
    /// Returns whether the session changed.
    pub fn replace(&self, session: Session) -> bool {
        self.commit(session, false)
    }

    /// Swap in a new session and bump the epoch; always notifies.
    pub fn replace_and_resync(&self, session: Session) -> u64 {
        self.commit(session, true);
        self.epoch()
    }

    /// Register a subscriber; the current snapshot is delivered immediately.
    pub fn subscribe(&self) -> Receiver<Snapshot> {
        let (tx, rx) = async_channel::unbounded();
        let mut inner = self.inner.lock();
        // Fresh unbounded channel: cannot be full or closed yet
        let _ = tx.try_send(inner.current.clone());
        inner.subscribers.push(tx);
        rx
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|tx| !tx.is_closed());
        inner.subscribers.len()
    }

    fn commit(&self, session: Session, bump_epoch: bool) -> bool {
        let mut inner = self.inner.lock();
        let changed = inner.current.session != session;
        if !changed && !bump_epoch {
            return false;
        }

        inner.current.session = session;
        if bump_epoch {
            inner.current.epoch += 1;
        }

        let snapshot = inner.current.clone();
        inner
            .subscribers
            .retain(|tx| tx.try_send(snapshot.clone()).is_ok());
        tracing::debug!(
            state = ?snapshot.session.state(),
            epoch = snapshot.epoch,
            subscribers = inner.subscribers.len(),
            "session store updated"
        );
        changed
    }
}

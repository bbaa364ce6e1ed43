//! Scripted in-memory provider for tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use async_channel::Sender;
use async_trait::async_trait;
use serde_json::Value;

use super::{EventSubscription, ProviderEvent, ProviderInfo, WalletProvider};
use crate::error::ProviderError;

type Reply = Result<Value, ProviderError>;

/// Provider whose replies are queued per method.
///
/// The last queued reply for a method is sticky: it keeps being returned
/// once the queue is down to it. Unscripted methods fail with code 4200.
#[derive(Default)]
pub struct MockProvider {
    replies: RefCell<HashMap<String, VecDeque<Reply>>>,
    calls: RefCell<Vec<(String, Value)>>,
    listener: RefCell<Option<Sender<ProviderEvent>>>,
    unsubscribed: Rc<Cell<bool>>,
    pauses: Cell<u32>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: &str, value: Value) -> &Self {
        self.push(method, Ok(value))
    }

    pub fn fail(&self, method: &str, code: i64, message: &str) -> &Self {
        self.push(method, Err(ProviderError::new(code, message)))
    }

    fn push(&self, method: &str, reply: Reply) -> &Self {
        self.replies
            .borrow_mut()
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Number of requests made for `method`.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|(m, _)| m == method).count()
    }

    /// Methods requested, in order.
    pub fn methods(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Params of the n-th request for `method`.
    pub fn params(&self, method: &str, n: usize) -> Option<Value> {
        self.calls
            .borrow()
            .iter()
            .filter(|(m, _)| m == method)
            .nth(n)
            .map(|(_, p)| p.clone())
    }

    /// Push a notification to the active subscription.
    pub fn emit(&self, event: ProviderEvent) {
        if let Some(tx) = self.listener.borrow().as_ref() {
            let _ = tx.try_send(event);
        }
    }

    /// Close the notification stream from the provider side.
    pub fn close_events(&self) {
        if let Some(tx) = self.listener.borrow_mut().take() {
            tx.close();
        }
    }

    pub fn was_unsubscribed(&self) -> bool {
        self.unsubscribed.get()
    }

    pub fn pause_count(&self) -> u32 {
        self.pauses.get()
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo::new("MetaMask", true)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.calls.borrow_mut().push((method.to_string(), params));

        let mut replies = self.replies.borrow_mut();
        let queue = replies.get_mut(method).ok_or_else(|| {
            ProviderError::new(ProviderError::UNSUPPORTED_METHOD, format!("{} not scripted", method))
        })?;
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        reply.unwrap_or_else(|| {
            Err(ProviderError::new(ProviderError::UNSUPPORTED_METHOD, "no reply"))
        })
    }

    fn subscribe(&self) -> Result<EventSubscription, ProviderError> {
        let (tx, rx) = async_channel::unbounded();
        *self.listener.borrow_mut() = Some(tx);
        self.unsubscribed.set(false);

        let flag = self.unsubscribed.clone();
        Ok(EventSubscription::new(rx, move || flag.set(true)))
    }

    async fn pause(&self, _duration: Duration) {
        self.pauses.set(self.pauses.get() + 1);
    }
}

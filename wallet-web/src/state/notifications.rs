//! Toast notifications

use leptos::prelude::*;
use lib_core::{Severity, WalletError};
use shared::utils::truncate_text;

const DISMISS_AFTER_MS: u32 = 5_000;
/// Provider errors are passed through verbatim and can be long.
const MAX_MESSAGE_LEN: usize = 160;

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
}

/// Notification queue shared by all components.
#[derive(Clone, Copy)]
pub struct Notifications {
    pub items: RwSignal<Vec<Notice>>,
    next_id: StoredValue<u64>,
}

impl Notifications {
    fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, severity: Severity, message: impl Into<String>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        let message = message.into();
        match severity {
            Severity::Error => log::error!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Info => log::info!("{}", message),
        }
        let message = truncate_text(&message, MAX_MESSAGE_LEN);
        self.items.update(|items| items.push(Notice { id, severity, message }));

        let items = self.items;
        leptos::task::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(DISMISS_AFTER_MS).await;
            items.update(|items| items.retain(|n| n.id != id));
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    /// Report an error with the severity and wording it carries.
    pub fn error(&self, error: &WalletError) {
        self.push(error.severity(), error.user_message());
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|n| n.id != id));
    }
}

pub fn provide_notifications() -> Notifications {
    let notifications = Notifications::new();
    provide_context(notifications);
    notifications
}

pub fn use_notifications() -> Notifications {
    expect_context::<Notifications>()
}

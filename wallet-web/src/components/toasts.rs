//! Notification toasts

use leptos::prelude::*;
use lib_core::Severity;

use crate::state::notifications::use_notifications;

fn toast_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "toast toast-info",
        Severity::Warning => "toast toast-warning",
        Severity::Error => "toast toast-error",
    }
}

#[component]
pub fn Toasts() -> impl IntoView {
    let notifications = use_notifications();

    view! {
        <div class="toast-container">
            <For
                each=move || notifications.items.get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class=toast_class(notice.severity) on:click=move |_| notifications.dismiss(id)>
                            {notice.message}
                        </div>
                    }
                }
            />
        </div>
    }
}

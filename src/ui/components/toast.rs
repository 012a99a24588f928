use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dioxus::prelude::*;

const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(6);
const MAX_TOASTS: usize = 4;

static TOAST_COUNTER: AtomicUsize = AtomicUsize::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: usize,
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: TOAST_COUNTER.fetch_add(1, Ordering::Relaxed),
            kind,
            text: text.into(),
        }
    }
}

/// Appends a toast, dropping the oldest once the stack is full.
pub fn enqueue(entries: &mut Vec<ToastMessage>, message: ToastMessage) {
    if entries.len() >= MAX_TOASTS {
        entries.remove(0);
    }
    entries.push(message);
}

pub fn push_toast(mut toasts: Signal<Vec<ToastMessage>>, kind: ToastKind, message: impl Into<String>) {
    let message = ToastMessage::new(kind, message);
    toasts.with_mut(|entries| enqueue(entries, message));
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let entries = toasts();

    if entries.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div { class: "toast-stack",
            ul {
                for message in entries {
                    ToastCard { key: "{message.id}", message, toasts }
                }
            }
        }
    }
}

#[component]
fn ToastCard(message: ToastMessage, mut toasts: Signal<Vec<ToastMessage>>) -> Element {
    let id = message.id;
    let _auto_dismiss = use_future(move || async move {
        tokio::time::sleep(TOAST_AUTO_DISMISS).await;
        toasts.with_mut(|items| items.retain(|toast| toast.id != id));
    });

    let (tone, icon) = match message.kind {
        ToastKind::Info => ("toast-info", "ℹ️"),
        ToastKind::Success => ("toast-success", "✅"),
        ToastKind::Error => ("toast-error", "⛔"),
    };

    rsx! {
        li { class: "toast {tone}",
            span { "{icon}" }
            p { "{message.text}" }
            button {
                class: "toast-dismiss",
                onclick: move |_| toasts.with_mut(|items| items.retain(|toast| toast.id != id)),
                "Dismiss"
            }
        }
    }
}

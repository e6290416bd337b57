//! Transient notifications shown above a form and hidden after a delay.

use leptos::prelude::*;
use thaw::*;

/// How long a notice stays on screen
pub const NOTICE_TIMEOUT_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Clone, Copy)]
pub struct Notices {
    pub items: RwSignal<Vec<Notice>>,
    next_id: RwSignal<u64>,
}

impl Notices {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(NoticeKind::Success, text.into());
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.push(NoticeKind::Warning, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(NoticeKind::Error, text.into());
    }

    fn push(&self, kind: NoticeKind, text: String) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.items.update(|items| items.push(Notice { id, kind, text }));

        let items = self.items;
        leptos::task::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(NOTICE_TIMEOUT_MS).await;
            items.update(|items| items.retain(|n| n.id != id));
        });
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the current notices as thaw message bars
#[component]
pub fn NoticeStack(notices: Notices) -> impl IntoView {
    view! {
        <div class="notice-stack">
            <For
                each=move || notices.items.get()
                key=|n| n.id
                children=|n| {
                    let intent = match n.kind {
                        NoticeKind::Success => MessageBarIntent::Success,
                        NoticeKind::Warning => MessageBarIntent::Warning,
                        NoticeKind::Error => MessageBarIntent::Error,
                    };
                    view! {
                        <MessageBar intent=intent>{n.text}</MessageBar>
                    }
                }
            />
        </div>
    }
}

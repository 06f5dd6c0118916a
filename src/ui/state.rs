use std::time::{Duration, Instant};

use crate::common::types::{ChatSummary, chat_label};
use crate::config::AppConfig;
use crate::notify::{Notification, NotificationRouter, Notifier};
use crate::session::{ChatSync, PresenceTracker};

const TOAST_LIFETIME: Duration = Duration::from_secs(5);
const MAX_TOASTS: usize = 4;

/// In-app notification bubble.
pub struct Toast {
    pub title: String,
    pub body: String,
    pub expires_at: Instant,
}

/// Trạng thái cục bộ của UI. Session state lives in the two trackers;
/// everything else here is view plumbing.
pub struct AppState {
    pub sync: ChatSync,
    pub presence: PresenceTracker,
    pub router: NotificationRouter,
    pub input_text: String,
    pub recent_chats: Vec<ChatSummary>,
    pub toasts: Vec<Toast>,
    pub connected: bool,
    pub window_focused: bool,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let mut router = NotificationRouter::new(config.notifications_enabled);
        // no interactive permission prompt on desktop: granted up front,
        // the config toggle does the actual gating
        router.grant();
        Self {
            sync: ChatSync::new(),
            presence: PresenceTracker::new(config.username.clone()),
            router,
            input_text: String::new(),
            recent_chats: Vec::new(),
            toasts: Vec::new(),
            connected: false,
            window_focused: true,
        }
    }

    pub fn chat_title(&self) -> String {
        match self.sync.active_chat() {
            Some(chat_id) => chat_label(chat_id, self.presence.local_user()),
            None => "Rust Realtime Chat".to_string(),
        }
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }
}

impl Notifier for AppState {
    fn notify(&mut self, notification: Notification) {
        log::info!(
            "Notification ({:?}) {}: {}",
            notification.kind,
            notification.title,
            notification.body
        );
        self.toasts.push(Toast {
            title: notification.title,
            body: notification.body,
            expires_at: Instant::now() + TOAST_LIFETIME,
        });
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
    }
}

use crate::common::mentions;
use crate::common::types::{self, ChatMessage};

/// Classification precedence for an inbound message: an explicit mention
/// of the local user wins, then direct chats, then everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Mention,
    DirectMessage,
    GroupMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub chat_id: String,
}

impl Notification {
    pub fn mention(from_user: &str, body: &str, chat_id: &str) -> Self {
        Self {
            kind: NotificationKind::Mention,
            title: format!("{from_user} mentioned you"),
            body: preview(body, 100),
            chat_id: chat_id.to_string(),
        }
    }

    pub fn direct_message(from_user: &str, body: &str, chat_id: &str) -> Self {
        Self {
            kind: NotificationKind::DirectMessage,
            title: format!("New message from {from_user}"),
            body: preview(body, 100),
            chat_id: chat_id.to_string(),
        }
    }

    pub fn group_message(from_user: &str, body: &str, chat_label: &str, chat_id: &str) -> Self {
        Self {
            kind: NotificationKind::GroupMessage,
            title: chat_label.to_string(),
            body: format!("{from_user}: {}", preview(body, 80)),
            chat_id: chat_id.to_string(),
        }
    }
}

/// Char-boundary-safe preview with a trailing ellipsis past `limit`.
pub fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let truncated: String = text.chars().take(limit).collect();
    format!("{truncated}...")
}

/// Sink for routed notifications; the UI installs an in-app toast
/// implementation, a headless host could log or shell out.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    Default,
    Granted,
    Denied,
}

/// Decides whether a message event turns into a notification. Mentions
/// always deliver, direct messages unless the user is already looking at
/// that chat with the window focused, group messages only when the window
/// is unfocused. A denied permission sticks for the whole session.
pub struct NotificationRouter {
    permission: Permission,
    enabled: bool,
}

impl NotificationRouter {
    pub fn new(enabled: bool) -> Self {
        Self {
            permission: Permission::Default,
            enabled,
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn grant(&mut self) {
        if self.permission != Permission::Denied {
            self.permission = Permission::Granted;
        }
    }

    /// Record a denial; no re-prompt for the rest of the session.
    pub fn record_denied(&mut self) {
        self.permission = Permission::Denied;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Kind of notification `message` warrants for `local_user`, if any.
    /// The local user's own messages never notify.
    pub fn classify(
        message: &ChatMessage,
        chat_id: &str,
        local_user: &str,
    ) -> Option<NotificationKind> {
        if message.username == local_user {
            return None;
        }
        if mentions::mentions_user(message, local_user) {
            Some(NotificationKind::Mention)
        } else if types::is_direct_chat(chat_id) {
            Some(NotificationKind::DirectMessage)
        } else {
            Some(NotificationKind::GroupMessage)
        }
    }

    pub fn should_deliver(
        &self,
        kind: NotificationKind,
        window_focused: bool,
        viewing_chat: bool,
    ) -> bool {
        if !self.enabled || self.permission != Permission::Granted {
            return false;
        }
        match kind {
            NotificationKind::Mention => true,
            NotificationKind::DirectMessage => !window_focused || !viewing_chat,
            NotificationKind::GroupMessage => !window_focused,
        }
    }
}

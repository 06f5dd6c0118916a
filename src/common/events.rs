use crate::common::types::{ChatMessage, ChatSummary, User};

/// Sự kiện từ tầng mạng gửi lên UI.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    Connected,
    Disconnected,
    /// A message pushed over the channel; may belong to any chat and may
    /// duplicate one already delivered via a history fetch.
    MessagePushed {
        chat_id: String,
        message: ChatMessage,
    },
    UserStatus {
        username: String,
        online: bool,
    },
    UserTyping {
        chat_id: String,
        username: String,
    },
    UserStopTyping {
        chat_id: String,
        username: String,
    },
    MentionPushed {
        from_user: String,
        chat_id: String,
        message: String,
    },
    RosterLoaded(Vec<User>),
    /// Result of a history fetch, tagged with the generation it was
    /// requested under so stale results can be discarded.
    HistoryLoaded {
        chat_id: String,
        generation: u64,
        messages: Vec<ChatMessage>,
    },
    RecentChatsLoaded(Vec<ChatSummary>),
    DirectChatReady {
        chat_id: String,
        participant: String,
    },
    /// Server accepted the submission; the message itself arrives via push.
    MessageAccepted {
        chat_id: String,
    },
    /// Transport failure on send; `content` goes back into the input.
    SendFailed {
        chat_id: String,
        content: String,
    },
}

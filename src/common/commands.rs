use std::path::PathBuf;

/// Lệnh UI gửi xuống tầng mạng.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    JoinChat {
        chat_id: String,
    },
    LeaveChat {
        chat_id: String,
    },
    Typing {
        chat_id: String,
    },
    StopTyping {
        chat_id: String,
    },
    /// One-time batch fetch of a chat's history. `generation` rides along
    /// and comes back with the result; the UI drops mismatches.
    FetchHistory {
        chat_id: String,
        generation: u64,
    },
    SendMessage {
        chat_id: String,
        content: String,
    },
    SendFile {
        chat_id: String,
        path: PathBuf,
    },
    /// Ask the server for the canonical DM chat id with `participant`.
    OpenDirectChat {
        participant: String,
    },
    RefreshRoster,
    RefreshRecentChats,
}

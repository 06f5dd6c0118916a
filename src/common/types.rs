use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Id của phòng chat chung.
pub const GLOBAL_CHAT: &str = "global";

/// Domain model đại diện một tin nhắn chat.
///
/// Id do server cấp; client không bao giờ tự sinh id tin nhắn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub content: String,
    /// Original text before the server processed mentions into markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    #[serde(default)]
    pub mentions: Vec<String>,
    /// ISO-8601 timestamp as the server sends it; parsed lazily.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl ChatMessage {
    /// Text suitable for previews and notifications.
    pub fn display_text(&self) -> &str {
        self.raw_content.as_deref().unwrap_or(&self.content)
    }

    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    /// Original name shown to the user.
    pub filename: String,
    /// Name under which the server stored the file.
    pub stored_filename: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
    /// The server historically labels this case `document` on the wire.
    #[serde(alias = "document")]
    File,
}

/// Một người dùng trong danh bạ. Trạng thái `online` được cập nhật
/// tại chỗ khi có sự kiện presence; không bao giờ bị xoá trong phiên.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub online: bool,
}

impl User {
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    #[default]
    Public,
    Direct,
}

/// Một cuộc hội thoại với lịch sử tin nhắn đầy đủ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ChatKind,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Entry in the recent-chats list (`/api/user_chats`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ChatKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub other_user: Option<User>,
    #[serde(default)]
    pub last_message: Option<ChatMessage>,
    #[serde(default)]
    pub unread_count: u32,
}

/// Engagement results from the clips endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipLike {
    pub liked: bool,
    pub likes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipComment {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub author_display_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub likes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipShare {
    pub shares: u32,
    pub shared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowChange {
    pub following: bool,
    pub followers_count: u32,
    pub following_count: u32,
}

/// Deterministic id for a direct-message chat: participants are
/// normalized, sorted and joined, so both sides derive the same id.
pub fn direct_chat_id(a: &str, b: &str) -> String {
    let mut participants = [normalize_participant(a), normalize_participant(b)];
    participants.sort();
    format!("dm_{}_{}", participants[0], participants[1])
}

fn normalize_participant(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

pub fn is_direct_chat(chat_id: &str) -> bool {
    chat_id.starts_with("dm_") || chat_id.starts_with("direct_")
}

/// Human-readable name for a chat id, from the local user's point of view.
pub fn chat_label(chat_id: &str, local_user: &str) -> String {
    if chat_id == GLOBAL_CHAT {
        return "Global Chat".to_string();
    }
    if is_direct_chat(chat_id) {
        let local = normalize_participant(local_user);
        let other = chat_id
            .split('_')
            .skip(1)
            .find(|part| !part.is_empty() && *part != local);
        return other.map_or_else(|| "Direct Message".to_string(), str::to_string);
    }
    chat_id.to_string()
}

/// The server emits naive local timestamps (`isoformat()`); accept those
/// and full RFC 3339 strings alike.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_chat_id_is_order_independent() {
        assert_eq!(direct_chat_id("alice", "bob"), direct_chat_id("bob", "alice"));
        assert_eq!(direct_chat_id("alice", "bob"), "dm_alice_bob");
    }

    #[test]
    fn direct_chat_id_normalizes_case_and_spaces() {
        assert_eq!(direct_chat_id("Mai Anh", "bob"), "dm_bob_mai_anh");
    }

    #[test]
    fn direct_chat_detection() {
        assert!(is_direct_chat("dm_alice_bob"));
        assert!(is_direct_chat("direct_42"));
        assert!(!is_direct_chat("global"));
        assert!(!is_direct_chat("team-frontend"));
    }

    #[test]
    fn chat_labels() {
        assert_eq!(chat_label("global", "alice"), "Global Chat");
        assert_eq!(chat_label("dm_alice_bob", "alice"), "bob");
        assert_eq!(chat_label("dm_alice_bob", "Alice"), "bob");
        assert_eq!(chat_label("team-frontend", "alice"), "team-frontend");
    }

    #[test]
    fn attachment_kind_accepts_document_alias() {
        let attachment: Attachment = serde_json::from_str(
            r#"{"type": "document", "filename": "notes.pdf", "stored_filename": "ab12.pdf", "size": 1024}"#,
        )
        .unwrap();
        assert_eq!(attachment.kind, AttachmentKind::File);

        let image: AttachmentKind = serde_json::from_str(r#""image""#).unwrap();
        assert_eq!(image, AttachmentKind::Image);
    }

    #[test]
    fn message_decodes_with_missing_optional_fields() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"id": "m1", "username": "bob", "content": "hi"}"#).unwrap();
        assert!(message.attachments.is_empty());
        assert!(message.mentions.is_empty());
        assert_eq!(message.display_text(), "hi");
    }

    #[test]
    fn display_text_prefers_raw_content() {
        let message: ChatMessage = serde_json::from_str(
            r#"{"id": "m1", "username": "bob",
                "content": "<span class=\"mention\">@alice</span> hello",
                "raw_content": "@alice hello"}"#,
        )
        .unwrap();
        assert_eq!(message.display_text(), "@alice hello");
    }

    #[test]
    fn parses_naive_and_rfc3339_timestamps() {
        assert!(parse_timestamp("2026-08-05T10:30:00.123456").is_some());
        assert!(parse_timestamp("2026-08-05T10:30:00+00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}

use serde::{Deserialize, Serialize};

use crate::common::ChatMessage;

/// Khung sự kiện client gửi lên server qua push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    JoinChat { chat_id: String },
    LeaveChat { chat_id: String },
    Typing { chat_id: String },
    StopTyping { chat_id: String },
}

/// Khung sự kiện server đẩy xuống client.
///
/// The channel is at-least-once: frames may repeat, and the server may add
/// event names this client does not know. Unknown frames fail to decode
/// and are dropped by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerFrame {
    NewMessage {
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
    MentionNotification {
        from_user: String,
        chat_id: String,
        message: String,
        #[serde(default)]
        timestamp: Option<String>,
    },
    // room acknowledgements; received and ignored
    JoinedChat {
        chat_id: String,
    },
    LeftChat {
        chat_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_frames_use_server_event_names() {
        let frame = ClientFrame::JoinChat {
            chat_id: "global".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"event":"join_chat","data":{"chat_id":"global"}}"#
        );

        let frame = ClientFrame::StopTyping {
            chat_id: "dm_alice_bob".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"event":"stop_typing","data":{"chat_id":"dm_alice_bob"}}"#
        );
    }

    #[test]
    fn decodes_new_message_frame() {
        let text = r#"{
            "event": "new_message",
            "data": {
                "chat_id": "global",
                "message": {"id": "m1", "username": "bob", "content": "hi"}
            }
        }"#;
        match serde_json::from_str::<ServerFrame>(text).unwrap() {
            ServerFrame::NewMessage { chat_id, message } => {
                assert_eq!(chat_id, "global");
                assert_eq!(message.id, "m1");
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn decodes_presence_and_typing_frames() {
        let status: ServerFrame = serde_json::from_str(
            r#"{"event": "user_status", "data": {"username": "alice", "online": true}}"#,
        )
        .unwrap();
        assert_eq!(
            status,
            ServerFrame::UserStatus {
                username: "alice".to_string(),
                online: true,
            }
        );

        let typing: ServerFrame = serde_json::from_str(
            r#"{"event": "user_typing", "data": {"chat_id": "global", "username": "alice"}}"#,
        )
        .unwrap();
        assert_eq!(
            typing,
            ServerFrame::UserTyping {
                chat_id: "global".to_string(),
                username: "alice".to_string(),
            }
        );
    }

    #[test]
    fn decodes_mention_notification_without_timestamp() {
        let frame: ServerFrame = serde_json::from_str(
            r#"{"event": "mention_notification",
                "data": {"from_user": "bob", "chat_id": "global", "message": "@mai hello"}}"#,
        )
        .unwrap();
        assert!(matches!(frame, ServerFrame::MentionNotification { .. }));
    }

    #[test]
    fn unknown_event_fails_to_decode() {
        assert!(
            serde_json::from_str::<ServerFrame>(r#"{"event": "receive_message", "data": {}}"#)
                .is_err()
        );
    }
}

use serde::Deserialize;
use thiserror::Error;

use crate::common::types::{
    self, Chat, ChatMessage, ChatSummary, ClipComment, ClipLike, ClipShare, FollowChange, User,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("chat {0} not found")]
    UnknownChat(String),
}

/// Thin client for the server's `/api/*` endpoints. Cheap to clone; each
/// in-flight call runs on its own task so a slow fetch never holds up the
/// push channel.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        let response = self.http.get(self.url("/api/users")).send().await?;
        Ok(checked(response)?.json().await?)
    }

    /// Full message history for a chat. Direct chats have a dedicated
    /// endpoint; public chats come from the full chat listing.
    pub async fn fetch_history(&self, chat_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        if types::is_direct_chat(chat_id) {
            let response = self
                .http
                .get(self.url(&format!("/api/dm/{chat_id}")))
                .send()
                .await?;
            let chat: Chat = checked(response)?.json().await?;
            return Ok(chat.messages);
        }
        let response = self.http.get(self.url("/api/chats")).send().await?;
        let chats: Vec<Chat> = checked(response)?.json().await?;
        chats
            .into_iter()
            .find(|chat| chat.id == chat_id)
            .map(|chat| chat.messages)
            .ok_or_else(|| ApiError::UnknownChat(chat_id.to_string()))
    }

    /// Submit a message. The authoritative copy comes back later over the
    /// push channel; the returned message is only useful for diagnostics.
    pub async fn send_message(
        &self,
        chat_id: &str,
        content: &str,
    ) -> Result<ChatMessage, ApiError> {
        let response = self
            .http
            .post(self.url("/api/send_message"))
            .form(&[("chat_id", chat_id), ("content", content)])
            .send()
            .await?;
        Ok(checked(response)?.json().await?)
    }

    /// Submit a message with a file attachment (multipart form).
    pub async fn send_file(
        &self,
        chat_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ChatMessage, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("content", String::new())
            .part("file", part);
        let response = self
            .http
            .post(self.url("/api/send_message"))
            .multipart(form)
            .send()
            .await?;
        Ok(checked(response)?.json().await?)
    }

    /// Create (or look up) the DM chat with `participant`; returns the
    /// canonical chat id.
    pub async fn create_dm(&self, participant: &str) -> Result<String, ApiError> {
        #[derive(Deserialize)]
        struct CreatedDm {
            chat_id: String,
        }
        let response = self
            .http
            .post(self.url("/api/create_dm"))
            .form(&[("participant", participant)])
            .send()
            .await?;
        let created: CreatedDm = checked(response)?.json().await?;
        Ok(created.chat_id)
    }

    pub async fn user_chats(&self) -> Result<Vec<ChatSummary>, ApiError> {
        let response = self.http.get(self.url("/api/user_chats")).send().await?;
        Ok(checked(response)?.json().await?)
    }

    // --- clips engagement ---

    pub async fn like_clip(&self, clip_id: &str) -> Result<ClipLike, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/api/clips/{clip_id}/like")))
            .send()
            .await?;
        Ok(checked(response)?.json().await?)
    }

    pub async fn comment_clip(
        &self,
        clip_id: &str,
        content: &str,
    ) -> Result<ClipComment, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/api/clips/{clip_id}/comment")))
            .form(&[("content", content)])
            .send()
            .await?;
        Ok(checked(response)?.json().await?)
    }

    pub async fn share_clip(&self, clip_id: &str) -> Result<ClipShare, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/api/clips/{clip_id}/share")))
            .send()
            .await?;
        Ok(checked(response)?.json().await?)
    }

    pub async fn like_comment(&self, comment_id: &str) -> Result<ClipLike, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/api/comments/{comment_id}/like")))
            .send()
            .await?;
        Ok(checked(response)?.json().await?)
    }

    pub async fn follow_user(&self, username: &str) -> Result<FollowChange, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/api/follow/{username}")))
            .send()
            .await?;
        Ok(checked(response)?.json().await?)
    }
}

fn checked(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = ApiClient::new("http://chat.example:2012/");
        assert_eq!(api.url("/api/users"), "http://chat.example:2012/api/users");
    }

    #[test]
    fn engagement_responses_decode() {
        let like: ClipLike = serde_json::from_str(r#"{"liked": true, "likes": 7}"#).unwrap();
        assert!(like.liked);

        let share: ClipShare = serde_json::from_str(r#"{"shares": 3, "shared": true}"#).unwrap();
        assert_eq!(share.shares, 3);

        let follow: FollowChange = serde_json::from_str(
            r#"{"following": false, "followers_count": 10, "following_count": 4}"#,
        )
        .unwrap();
        assert!(!follow.following);

        let comment: ClipComment = serde_json::from_str(
            r#"{"id": "c1", "author": "bob", "author_display_name": "Bob",
                "content": "nice clip", "created_at": "2026-08-05T10:00:00", "likes": 0,
                "liked_by": []}"#,
        )
        .unwrap();
        assert_eq!(comment.author, "bob");
    }
}

use std::collections::HashSet;

use crate::common::ChatMessage;

/// Transition plan produced by [`ChatSync::open_chat`]. The caller is
/// expected to leave/join the push-channel rooms and start a history
/// fetch tagged with `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChat {
    pub leave: Option<String>,
    pub join: String,
    pub generation: u64,
}

/// Outcome of a pushed message event.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Appended to the visible list.
    Rendered,
    /// Id already on screen; the event was dropped.
    Duplicate,
    /// Belongs to another chat; handed back for recent-chats bookkeeping
    /// and notification routing.
    OtherChat(ChatMessage),
}

/// Keeps the visible message list for the active chat consistent with the
/// server despite messages arriving over two independent paths: the batch
/// history fetch and the continuous push stream.
///
/// The server is the sole authority on message ids and ordering, so there
/// is no optimistic local copy to reconcile. The only invariant enforced
/// here is render-once-per-view, keyed by the server-assigned id.
pub struct ChatSync {
    active_chat: Option<String>,
    generation: u64,
    messages: Vec<ChatMessage>,
    rendered_ids: HashSet<String>,
}

impl ChatSync {
    pub fn new() -> Self {
        Self {
            active_chat: None,
            generation: 0,
            messages: Vec::new(),
            rendered_ids: HashSet::new(),
        }
    }

    pub fn active_chat(&self) -> Option<&str> {
        self.active_chat.as_deref()
    }

    pub fn is_active(&self, chat_id: &str) -> bool {
        self.active_chat.as_deref() == Some(chat_id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Switch the active chat. Clears the view; a fetch for the old chat
    /// that is still in flight will carry a stale generation and be
    /// discarded by [`apply_history`](Self::apply_history).
    pub fn open_chat(&mut self, chat_id: &str) -> OpenChat {
        let leave = self.active_chat.replace(chat_id.to_string());
        self.generation += 1;
        self.messages.clear();
        self.rendered_ids.clear();
        OpenChat {
            leave,
            join: chat_id.to_string(),
            generation: self.generation,
        }
    }

    /// Merge a fetched history batch into the view. Returns false when the
    /// batch is stale (the user switched chats after the fetch started).
    ///
    /// Pushed messages may have landed before the fetch completed; the
    /// rendered-id set absorbs the overlap and the list is re-sorted so
    /// history lands in stream order.
    pub fn apply_history(
        &mut self,
        chat_id: &str,
        generation: u64,
        history: Vec<ChatMessage>,
    ) -> bool {
        if generation != self.generation || !self.is_active(chat_id) {
            log::debug!("Discarding stale history for {chat_id} (generation {generation})");
            return false;
        }
        for message in history {
            if self.rendered_ids.insert(message.id.clone()) {
                self.messages.push(message);
            }
        }
        self.messages
            .sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        true
    }

    /// Handle a pushed message. Safe to call any number of times with the
    /// same message id; duplicates are dropped.
    pub fn on_incoming(&mut self, chat_id: &str, message: ChatMessage) -> Incoming {
        if !self.is_active(chat_id) {
            return Incoming::OtherChat(message);
        }
        if !self.rendered_ids.insert(message.id.clone()) {
            return Incoming::Duplicate;
        }
        self.messages.push(message);
        Incoming::Rendered
    }

    /// Take the pending input for submission. Blank input is a no-op and
    /// the input is left untouched; otherwise the input is cleared up
    /// front and the trimmed text returned. The message is not rendered
    /// locally; display waits for the push echo.
    pub fn take_outgoing(input: &mut String) -> Option<String> {
        let content = input.trim();
        if content.is_empty() {
            return None;
        }
        let content = content.to_string();
        input.clear();
        Some(content)
    }
}

impl Default for ChatSync {
    fn default() -> Self {
        Self::new()
    }
}

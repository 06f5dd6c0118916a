use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::common::User;

/// Idle window after the last keystroke before `stop_typing` fires.
pub const TYPING_IDLE_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingSignal {
    Started,
    Stopped,
}

/// Trailing-edge debounce for the local typing signal: the first input of
/// a burst yields `Started`, further input only re-arms the deadline, and
/// `Stopped` fires once when the idle window elapses.
#[derive(Debug, Default)]
pub struct TypingDebounce {
    deadline: Option<Instant>,
}

impl TypingDebounce {
    pub fn on_input(&mut self, now: Instant) -> Option<TypingSignal> {
        let first = self.deadline.is_none();
        self.deadline = Some(now + TYPING_IDLE_WINDOW);
        first.then_some(TypingSignal::Started)
    }

    pub fn poll(&mut self, now: Instant) -> Option<TypingSignal> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(TypingSignal::Stopped)
            }
            _ => None,
        }
    }

    /// Drop the pending deadline, e.g. after a message was sent. Yields
    /// `Stopped` if a burst was in progress so the caller can emit the
    /// stop signal immediately.
    pub fn cancel(&mut self) -> Option<TypingSignal> {
        self.deadline.take().map(|_| TypingSignal::Stopped)
    }
}

/// Tracks per-user online status and who is typing in the active chat.
///
/// The roster is mutated in place on presence events and never shrinks
/// during a session. The typing set is scoped to the active chat and
/// cleared on every chat switch; there is no receiver-side expiry, a
/// member leaves only on an explicit stop signal.
pub struct PresenceTracker {
    local_user: String,
    roster: Vec<User>,
    active_chat: Option<String>,
    typing: HashSet<String>,
    debounce: TypingDebounce,
}

impl PresenceTracker {
    pub fn new(local_user: impl Into<String>) -> Self {
        Self {
            local_user: local_user.into(),
            roster: Vec::new(),
            active_chat: None,
            typing: HashSet::new(),
            debounce: TypingDebounce::default(),
        }
    }

    pub fn local_user(&self) -> &str {
        &self.local_user
    }

    pub fn users(&self) -> &[User] {
        &self.roster
    }

    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.roster.iter().find(|user| user.username == username)
    }

    /// Replace the roster with a fresh server copy (kept in server order).
    pub fn set_roster(&mut self, users: Vec<User>) {
        self.roster = users;
    }

    /// Flip a user's online flag. Unknown usernames are ignored; presence
    /// events never create roster entries.
    pub fn on_user_status(&mut self, username: &str, online: bool) -> bool {
        match self.roster.iter_mut().find(|user| user.username == username) {
            Some(user) => {
                user.online = online;
                true
            }
            None => false,
        }
    }

    /// Follow an active-chat transition; the typing set starts empty in
    /// the new chat.
    pub fn set_active_chat(&mut self, chat_id: &str) {
        self.active_chat = Some(chat_id.to_string());
        self.typing.clear();
    }

    pub fn on_remote_typing(&mut self, username: &str, chat_id: &str) -> bool {
        if self.active_chat.as_deref() != Some(chat_id) || username == self.local_user {
            return false;
        }
        self.typing.insert(username.to_string())
    }

    pub fn on_remote_stop_typing(&mut self, username: &str, chat_id: &str) -> bool {
        if self.active_chat.as_deref() != Some(chat_id) {
            return false;
        }
        self.typing.remove(username)
    }

    pub fn is_anyone_typing(&self) -> bool {
        !self.typing.is_empty()
    }

    /// Typing usernames in a stable order for display.
    pub fn typing_users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = self.typing.iter().map(String::as_str).collect();
        users.sort_unstable();
        users
    }

    pub fn on_local_input(&mut self, now: Instant) -> Option<TypingSignal> {
        self.debounce.on_input(now)
    }

    pub fn poll_local_typing(&mut self, now: Instant) -> Option<TypingSignal> {
        self.debounce.poll(now)
    }

    pub fn cancel_local_typing(&mut self) -> Option<TypingSignal> {
        self.debounce.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, online: bool) -> User {
        User {
            username: username.to_string(),
            display_name: username.to_uppercase(),
            avatar: None,
            online,
        }
    }

    fn tracker() -> PresenceTracker {
        let mut tracker = PresenceTracker::new("mai");
        tracker.set_roster(vec![user("alice", false), user("bob", true)]);
        tracker.set_active_chat("global");
        tracker
    }

    #[test]
    fn status_updates_known_users_in_place() {
        let mut tracker = tracker();
        assert!(tracker.on_user_status("alice", true));
        assert!(tracker.find_user("alice").unwrap().online);
    }

    #[test]
    fn status_for_unknown_user_is_ignored() {
        let mut tracker = tracker();
        assert!(!tracker.on_user_status("stranger", true));
        assert_eq!(tracker.users().len(), 2);
    }

    #[test]
    fn typing_tracks_only_the_active_chat() {
        let mut tracker = tracker();
        assert!(tracker.on_remote_typing("alice", "global"));
        assert!(!tracker.on_remote_typing("bob", "dm_bob_mai"));
        assert_eq!(tracker.typing_users(), vec!["alice"]);
    }

    #[test]
    fn local_user_never_enters_the_typing_set() {
        let mut tracker = tracker();
        assert!(!tracker.on_remote_typing("mai", "global"));
        assert!(!tracker.is_anyone_typing());
    }

    #[test]
    fn stop_typing_removes_membership() {
        let mut tracker = tracker();
        tracker.on_remote_typing("alice", "global");
        tracker.on_remote_typing("bob", "global");
        assert!(tracker.on_remote_stop_typing("alice", "global"));
        assert_eq!(tracker.typing_users(), vec!["bob"]);
        assert!(tracker.is_anyone_typing());
    }

    #[test]
    fn switching_chats_clears_the_typing_set() {
        let mut tracker = tracker();
        tracker.on_remote_typing("alice", "global");
        tracker.set_active_chat("dm_bob_mai");
        assert!(!tracker.is_anyone_typing());
    }

    #[test]
    fn debounce_emits_one_start_per_burst() {
        let mut debounce = TypingDebounce::default();
        let start = Instant::now();
        assert_eq!(debounce.on_input(start), Some(TypingSignal::Started));
        assert_eq!(debounce.on_input(start + Duration::from_millis(200)), None);
        assert_eq!(debounce.on_input(start + Duration::from_millis(400)), None);
    }

    #[test]
    fn debounce_stops_once_after_the_idle_window() {
        let mut debounce = TypingDebounce::default();
        let start = Instant::now();
        debounce.on_input(start);
        assert_eq!(debounce.poll(start + Duration::from_millis(999)), None);
        assert_eq!(
            debounce.poll(start + Duration::from_millis(1200)),
            Some(TypingSignal::Stopped)
        );
        // no repeat after the edge fired
        assert_eq!(debounce.poll(start + Duration::from_millis(2400)), None);
    }

    #[test]
    fn further_input_rearms_the_idle_window() {
        let mut debounce = TypingDebounce::default();
        let start = Instant::now();
        debounce.on_input(start);
        debounce.on_input(start + Duration::from_millis(800));
        // the original deadline passes without firing
        assert_eq!(debounce.poll(start + Duration::from_millis(1100)), None);
        assert_eq!(
            debounce.poll(start + Duration::from_millis(1800)),
            Some(TypingSignal::Stopped)
        );
    }

    #[test]
    fn resuming_after_a_stop_starts_a_new_burst() {
        let mut debounce = TypingDebounce::default();
        let start = Instant::now();
        debounce.on_input(start);
        debounce.poll(start + Duration::from_millis(1000));
        assert_eq!(
            debounce.on_input(start + Duration::from_millis(1500)),
            Some(TypingSignal::Started)
        );
    }

    #[test]
    fn cancel_reports_an_in_progress_burst() {
        let mut debounce = TypingDebounce::default();
        let start = Instant::now();
        assert_eq!(debounce.cancel(), None);
        debounce.on_input(start);
        assert_eq!(debounce.cancel(), Some(TypingSignal::Stopped));
        assert_eq!(debounce.poll(start + Duration::from_millis(2000)), None);
    }
}

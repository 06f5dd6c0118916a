use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::types::ChatMessage;

static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").expect("mention pattern"));

/// Usernames mentioned in `text`, deduplicated, in order of appearance.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for capture in MENTION_RE.captures_iter(text) {
        let username = &capture[1];
        if !seen.iter().any(|known: &String| known.eq_ignore_ascii_case(username)) {
            seen.push(username.to_string());
        }
    }
    seen
}

/// Whether `message` mentions `username`. Prefers the server-populated
/// mention list, falls back to scanning the text.
pub fn mentions_user(message: &ChatMessage, username: &str) -> bool {
    if message
        .mentions
        .iter()
        .any(|mention| mention.eq_ignore_ascii_case(username))
    {
        return true;
    }
    extract_mentions(message.display_text())
        .iter()
        .any(|mention| mention.eq_ignore_ascii_case(username))
}

/// Autocomplete query: the partial mention being typed at the end of the
/// input, if any. Returns the byte offset of the `@` and the text after it.
pub fn mention_query(text: &str) -> Option<(usize, &str)> {
    let at = text.rfind('@')?;
    let query = &text[at + 1..];
    if query.chars().any(char::is_whitespace) {
        return None;
    }
    Some((at, query))
}

/// Replace the in-progress mention with the chosen username.
pub fn apply_mention(text: &mut String, username: &str) {
    if let Some((at, _)) = mention_query(text) {
        text.truncate(at);
        text.push('@');
        text.push_str(username);
        text.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str, mentions: &[&str]) -> ChatMessage {
        ChatMessage {
            id: "m1".to_string(),
            username: "bob".to_string(),
            content: content.to_string(),
            raw_content: None,
            mentions: mentions.iter().map(|m| m.to_string()).collect(),
            timestamp: String::new(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn extracts_mentions_in_order_without_duplicates() {
        assert_eq!(
            extract_mentions("@alice ping @carol, cc @alice"),
            vec!["alice".to_string(), "carol".to_string()]
        );
        assert!(extract_mentions("no mentions here").is_empty());
    }

    #[test]
    fn mentions_user_prefers_server_list() {
        assert!(mentions_user(&message("hello", &["Alice"]), "alice"));
        assert!(!mentions_user(&message("hello", &["carol"]), "alice"));
    }

    #[test]
    fn mentions_user_falls_back_to_text_scan() {
        assert!(mentions_user(&message("hey @alice", &[]), "alice"));
        assert!(!mentions_user(&message("mail me at x@example.com ok", &[]), "alice"));
        // the scan does pick up the domain token; only exact username matches count
        assert!(!mentions_user(&message("x@example.com", &[]), "alice"));
    }

    #[test]
    fn query_tracks_trailing_mention_only() {
        assert_eq!(mention_query("hello @al"), Some((6, "al")));
        assert_eq!(mention_query("hello @"), Some((6, "")));
        assert_eq!(mention_query("hello @alice done"), None);
        assert_eq!(mention_query("hello"), None);
    }

    #[test]
    fn apply_mention_replaces_partial() {
        let mut text = "hello @al".to_string();
        apply_mention(&mut text, "alice");
        assert_eq!(text, "hello @alice ");
    }
}

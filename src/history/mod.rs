mod memory;

pub use memory::MemoryHistoryStore;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use crate::cli::Args;
use crate::models::chat::Speaker;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Records one user turn and the bot reply to it, dropping the oldest lines past the cap.
    async fn append_exchange(&self, session_id: &str, user: &str, bot: &str);

    /// Most recent lines for the session, oldest first, each already prefixed with its speaker.
    async fn recent_lines(&self, session_id: &str) -> Vec<String>;

    async fn clear(&self, session_id: &str);
}

pub fn initialize_history_store(args: &Args) -> Option<Arc<dyn HistoryStore>> {
    if !args.history_enabled || args.history_max_lines == 0 {
        info!("Conversation history disabled.");
        return None;
    }
    info!(
        "Conversation history kept in memory, {} lines per session, at most {} sessions",
        args.history_max_lines,
        args.history_max_sessions
    );
    Some(
        Arc::new(
            MemoryHistoryStore::new(args.history_max_lines).with_max_sessions(
                args.history_max_sessions
            )
        )
    )
}

/// One history line: `User: ...` or `Bot: ...`, embedded newlines folded to spaces.
pub fn history_line(speaker: Speaker, content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}: {}", speaker.label(), flat)
}

pub fn format_history_for_prompt(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut result = String::from("Previous conversation:\n");
    for line in lines {
        result.push_str(line);
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_line_is_single_line() {
        let line = history_line(Speaker::Bot, "first\n\nsecond  third\n");
        assert_eq!(line, "Bot: first second third");
    }

    #[test]
    fn empty_history_formats_to_nothing() {
        assert_eq!(format_history_for_prompt(&[]), "");
    }

    #[test]
    fn formatted_history_lists_lines_in_order() {
        let lines = vec!["User: hi".to_string(), "Bot: hello".to_string()];
        assert_eq!(
            format_history_for_prompt(&lines),
            "Previous conversation:\nUser: hi\nBot: hello\n"
        );
    }
}

use async_trait::async_trait;
use std::collections::{ HashMap, VecDeque };
use tokio::sync::RwLock;
use log::debug;

use super::{ history_line, HistoryStore };
use crate::models::chat::Speaker;

pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Default)]
struct Sessions {
    lines: HashMap<String, VecDeque<String>>,
    /// Session ids, least recently written first.
    order: VecDeque<String>,
}

impl Sessions {
    fn touch(&mut self, session_id: &str) {
        if let Some(pos) = self.order.iter().position(|id| id == session_id) {
            self.order.remove(pos);
        }
        self.order.push_back(session_id.to_string());
    }

    fn forget(&mut self, session_id: &str) {
        self.lines.remove(session_id);
        self.order.retain(|id| id != session_id);
    }
}

/// Per-session rolling history held in process memory. Holds at most
/// `max_sessions` sessions; writing to a new session past that evicts the
/// least recently written one.
pub struct MemoryHistoryStore {
    sessions: RwLock<Sessions>,
    max_lines: usize,
    max_sessions: usize,
}

impl MemoryHistoryStore {
    pub fn new(max_lines: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            max_lines,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append_exchange(&self, session_id: &str, user: &str, bot: &str) {
        if self.max_lines == 0 || self.max_sessions == 0 {
            return;
        }
        let mut sessions = self.sessions.write().await;
        sessions.touch(session_id);
        while sessions.order.len() > self.max_sessions {
            if let Some(evicted) = sessions.order.pop_front() {
                sessions.lines.remove(&evicted);
                debug!("Evicted history for session {}", evicted);
            }
        }

        let lines = sessions.lines.entry(session_id.to_string()).or_default();
        lines.push_back(history_line(Speaker::User, user));
        lines.push_back(history_line(Speaker::Bot, bot));
        while lines.len() > self.max_lines {
            lines.pop_front();
        }
        debug!("History for session {} now holds {} lines", session_id, lines.len());
    }

    async fn recent_lines(&self, session_id: &str) -> Vec<String> {
        self.sessions
            .read().await
            .lines.get(session_id)
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn clear(&self, session_id: &str) {
        self.sessions.write().await.forget(session_id);
    }
}

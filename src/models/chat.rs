use chrono::Local;
use serde::{ Serialize, Deserialize };

/// A chat bubble as the UI holds it. Lives only for the lifetime of a UI session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub is_user: bool,
    pub timestamp: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_user: true, timestamp: local_timestamp() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_user: false, timestamp: local_timestamp() }
    }
}

/// Local wall-clock time, e.g. `3:04:05 PM`.
pub fn local_timestamp() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Bot => "Bot",
        }
    }
}

//! Chat window state shared by the terminal client.
//!
//! The message list is append-only: a submit pushes the user's bubble
//! immediately, and the matching `receive` pushes either the bot reply or
//! a generic error bubble. Nothing is persisted.

pub mod client;
pub mod terminal;

use crate::models::chat::Message;
use client::{ ClientError, Reply };
use log::error;

pub const GENERIC_ERROR: &str = "Sorry, I could not process that. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

/// ANSI styling for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub header: &'static str,
    pub user_bubble: &'static str,
    pub bot_bubble: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

const RESET: &str = "\x1b[0m";

impl Theme {
    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light =>
                Palette {
                    header: "\x1b[1;37;45m",
                    user_bubble: "\x1b[37;45m",
                    bot_bubble: "\x1b[30;47m",
                    muted: "\x1b[90m",
                    reset: RESET,
                },
            Theme::Dark =>
                Palette {
                    header: "\x1b[1;97;44m",
                    user_bubble: "\x1b[97;44m",
                    bot_bubble: "\x1b[97;100m",
                    muted: "\x1b[37m",
                    reset: RESET,
                },
        }
    }
}

/// Whether a `COLORFGBG` value (`"fg;bg"`, sometimes `"fg;x;bg"`) describes a dark background.
pub fn dark_from_colorfgbg(value: Option<&str>) -> bool {
    value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .map(|bg| bg <= 6 || bg == 8)
        .unwrap_or(false)
}

/// The terminal's color-scheme preference. Defaults to light when unknown.
pub fn prefers_dark() -> bool {
    dark_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

#[derive(Debug, Clone, Default)]
pub struct ChatView {
    messages: Vec<Message>,
    input: String,
    is_loading: bool,
    dark_mode: bool,
    session_id: Option<String>,
}

impl ChatView {
    pub fn new(dark_mode: bool) -> Self {
        Self { dark_mode, ..Default::default() }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn theme(&self) -> Theme {
        if self.dark_mode { Theme::Dark } else { Theme::Light }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.dark_mode = !self.dark_mode;
        self.theme()
    }

    /// Moves the pending input into the message list and returns the text to send.
    /// Blank input is ignored and leaves the view untouched.
    pub fn submit(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        self.messages.push(Message::user(text.clone()));
        self.is_loading = true;
        Some(text)
    }

    pub fn receive(&mut self, result: Result<Reply, ClientError>) {
        match result {
            Ok(reply) => {
                if let Some(id) = reply.session_id {
                    self.session_id = Some(id);
                }
                self.messages.push(Message::bot(reply.text));
            }
            Err(e) => {
                error!("Error: {}", e);
                self.messages.push(Message::bot(GENERIC_ERROR));
            }
        }
        self.is_loading = false;
    }
}

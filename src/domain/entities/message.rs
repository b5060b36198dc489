use super::User;
use chrono::{DateTime, Utc};

/// Formatting mode requested for an outgoing reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Plain,
    Markdown,
}

impl ParseMode {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            ParseMode::Plain => None,
            ParseMode::Markdown => Some("Markdown"),
        }
    }
}

/// A text message delivered by the chat transport
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub sender: User,
    pub text: String,
    pub sent_at: Option<DateTime<Utc>>,
}

impl InboundMessage {
    pub fn new(chat_id: i64, sender: User, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender,
            text: text.into(),
            sent_at: None,
        }
    }

    pub fn with_sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = Some(sent_at);
        self
    }
}

/// A reply to be delivered to a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: ParseMode,
    pub disable_link_preview: bool,
}

impl OutboundReply {
    /// Markdown reply with link previews disabled, the format used for every
    /// command response.
    pub fn markdown(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: ParseMode::Markdown,
            disable_link_preview: true,
        }
    }

    pub fn plain(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: ParseMode::Plain,
            disable_link_preview: false,
        }
    }
}

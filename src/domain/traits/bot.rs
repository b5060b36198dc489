use async_trait::async_trait;
use crate::domain::entities::{InboundMessage, OutboundReply};
use crate::application::errors::BotError;

/// Bot trait - abstraction for the chat transport's outbound side
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Bot: Send + Sync {
    /// Deliver a reply to its chat
    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), BotError>;
}

/// Source of inbound updates, in arrival order.
///
/// Each call yields the next batch; an entry is `None` for updates that carry
/// no text message and must be skipped.
#[async_trait]
pub trait UpdateSource: Send {
    async fn next_updates(&mut self) -> Result<Vec<Option<InboundMessage>>, BotError>;
}

/// Identity reported by the chat transport at startup
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub username: String,
}

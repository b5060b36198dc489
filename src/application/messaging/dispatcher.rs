//! Command router - Authorizes, parses and dispatches inbound messages

use crate::application::messaging::replies;
use crate::application::services::{ContainerService, LifecycleAction};
use crate::domain::entities::{Command, InboundMessage, OutboundReply};
use crate::domain::traits::{Bot, ContainerEngine};

/// Routes each inbound message to a handler and sends back its reply
pub struct CommandRouter<B: Bot, E: ContainerEngine> {
    bot: B,
    containers: ContainerService<E>,
    allowed_user: i64,
}

impl<B: Bot, E: ContainerEngine> CommandRouter<B, E> {
    pub fn new(bot: B, engine: E, allowed_user: i64) -> Self {
        Self {
            bot,
            containers: ContainerService::new(engine),
            allowed_user,
        }
    }

    /// Handle one message end to end. Delivery failures are logged and dropped.
    pub async fn process(&self, message: InboundMessage) {
        let Some(reply) = self.handle(&message).await else {
            return;
        };

        if let Err(e) = self.bot.send_reply(&reply).await {
            tracing::error!(error = %e, chat_id = reply.chat_id, "Failed to send message");
        }
    }

    /// Produce the reply for a message without sending it
    pub async fn handle(&self, message: &InboundMessage) -> Option<OutboundReply> {
        if message.sender.id != self.allowed_user {
            tracing::warn!(
                user_id = message.sender.id,
                username = message.sender.username.as_deref().unwrap_or_default(),
                display_name = %message.sender.display_name(),
                "Unauthorized access attempt"
            );
            return Some(OutboundReply::plain(message.chat_id, replies::UNAUTHORIZED));
        }

        tracing::info!(
            user_id = message.sender.id,
            command = %message.text,
            sent_at = ?message.sent_at,
            "Processing command"
        );

        let command = Command::parse(&message.text)?;
        let text = self.dispatch(command).await;
        Some(OutboundReply::markdown(message.chat_id, text))
    }

    async fn dispatch(&self, command: Command) -> String {
        tracing::debug!(command = command.name(), "Dispatching command");

        match command {
            Command::List { detailed } => self.list(detailed).await,
            Command::Start { container } => {
                self.lifecycle(LifecycleAction::Start, &container).await
            }
            Command::Stop { container } => self.lifecycle(LifecycleAction::Stop, &container).await,
            Command::Restart { container } => {
                self.lifecycle(LifecycleAction::Restart, &container).await
            }
            Command::RestartUsage => replies::RESTART_USAGE.to_string(),
            Command::Logs { container, lines } => {
                let outcome = self.containers.logs(&container, lines).await;
                replies::logs(&outcome, &container)
            }
            Command::Help => replies::HELP.to_string(),
            Command::Unknown { .. } => replies::UNKNOWN_COMMAND.to_string(),
        }
    }

    async fn list(&self, detailed: bool) -> String {
        match self.containers.list().await {
            Ok(containers) => replies::container_list(&containers, detailed),
            Err(_) => replies::LIST_FAILED.to_string(),
        }
    }

    async fn lifecycle(&self, action: LifecycleAction, container: &str) -> String {
        let outcome = self.containers.apply(action, container).await;
        replies::action(action, &outcome, container)
    }
}

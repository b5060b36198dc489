//! Telegram adapter

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::{self, InboundMessage, OutboundReply, COMMAND_MENU};
use crate::domain::traits::{Bot, BotInfo, UpdateSource};

/// Extra time allowed on top of the long-poll timeout before a request is abandoned
const POLL_SLACK: Duration = Duration::from_secs(10);

/// Upper bound for every Bot API call other than the long poll
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub date: i64,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// The text message carried by this update, if any.
    ///
    /// Messages without text keep an empty body so that authorization still
    /// applies to them.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let message = self.message?;
        let from = message.from?;

        let mut sender = entities::User::new(from.id);
        if let Some(first) = from.first_name {
            sender = sender.with_name(first, from.last_name);
        }
        if let Some(username) = from.username {
            sender = sender.with_username(username);
        }

        let inbound = InboundMessage::new(message.chat.id, sender, message.text.unwrap_or_default());
        Some(match DateTime::from_timestamp(message.date, 0) {
            Some(sent_at) if message.date > 0 => inbound.with_sent_at(sent_at),
            _ => inbound,
        })
    }
}

/// Bot API envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
}

impl<'a> SendMessageRequest<'a> {
    fn from_reply(reply: &'a OutboundReply) -> Self {
        Self {
            chat_id: reply.chat_id,
            text: &reply.text,
            parse_mode: reply.parse_mode.as_str(),
            disable_web_page_preview: reply.disable_link_preview,
        }
    }
}

/// Telegram bot adapter
#[derive(Clone)]
pub struct TelegramAdapter {
    token: String,
    api_base: String,
    client: Client,
    offset: i64,
    poll_timeout: Duration,
    request_timeout: Duration,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: api_base.into(),
            client: Client::new(),
            offset: 0,
            poll_timeout: Duration::from_secs(60),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base.trim_end_matches('/'), self.token, method)
    }

    /// POST a Bot API method and unwrap its result
    async fn call<Req, Resp>(&self, method: &str, request: &Req, timeout: Duration) -> Result<Resp, BotError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        // Never let the token leak into error text through the request URL
        let response = self
            .client
            .post(self.api_url(method))
            .json(request)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| BotError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let data: ApiResponse<Resp> = response.json().await.map_err(|e| {
            if status.is_success() {
                BotError::Parse(e.without_url().to_string())
            } else {
                BotError::Network(format!("Telegram API error: {}", status))
            }
        })?;

        match data {
            ApiResponse { ok: true, result: Some(result), .. } => Ok(result),
            ApiResponse { description, .. } => Err(BotError::Api {
                method: method.to_string(),
                description: description.unwrap_or_else(|| status.to_string()),
            }),
        }
    }

    /// Fetch bot info from Telegram API; fails when the token is rejected
    pub async fn fetch_bot_info(&self) -> Result<BotInfo, BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            first_name: String,
            username: Option<String>,
        }

        #[derive(Serialize)]
        struct GetMeRequest {}

        let me: BotInfoResponse = self.call("getMe", &GetMeRequest {}, self.request_timeout).await?;
        Ok(BotInfo {
            username: me.username.unwrap_or(me.first_name),
        })
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<&'static str>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: vec!["message"],
        };

        self.call("getUpdates", &request, self.poll_timeout + POLL_SLACK).await
    }

    /// Offset acknowledging every update in `updates`
    pub fn next_offset(current: i64, updates: &[Update]) -> i64 {
        updates
            .iter()
            .map(|u| u.update_id + 1)
            .max()
            .map_or(current, |next| next.max(current))
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct BotCommand {
            command: &'static str,
            description: &'static str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<BotCommand>,
        }

        let request = SetMyCommandsRequest {
            commands: COMMAND_MENU
                .iter()
                .map(|&(command, description)| BotCommand { command, description })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request, self.request_timeout).await?;
        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), BotError> {
        tracing::debug!(chat_id = reply.chat_id, len = reply.text.len(), "Sending reply");

        let request = SendMessageRequest::from_reply(reply);
        let _: serde::de::IgnoredAny = self.call("sendMessage", &request, self.request_timeout).await?;
        Ok(())
    }
}

#[async_trait]
impl UpdateSource for TelegramAdapter {
    async fn next_updates(&mut self) -> Result<Vec<Option<InboundMessage>>, BotError> {
        let updates = self.get_updates(self.offset).await?;
        self.offset = Self::next_offset(self.offset, &updates);

        Ok(updates.into_iter().map(Update::into_inbound).collect())
    }
}

//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Chat platform integrations (Telegram)
//! - Docker: Container engine client

pub mod config;
pub mod adapters;
pub mod docker;

//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, InboundMessage, Command, ContainerSummary)
//! - Traits: Abstractions for infrastructure (Bot, UpdateSource, ContainerEngine)

pub mod entities;
pub mod traits;

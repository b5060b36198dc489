//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod engine;

pub use bot::{Bot, BotInfo, UpdateSource};
pub use engine::ContainerEngine;

#[cfg(test)]
pub use bot::MockBot;
#[cfg(test)]
pub use engine::MockContainerEngine;

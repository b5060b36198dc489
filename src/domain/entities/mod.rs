//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod container;

pub use user::User;
pub use message::{InboundMessage, OutboundReply};
pub use command::{Command, COMMAND_MENU};
pub use container::{find_container, ContainerState, ContainerSummary};

//! Message handling - Command routing and reply formatting

pub mod dispatcher;
pub mod replies;

pub use dispatcher::CommandRouter;

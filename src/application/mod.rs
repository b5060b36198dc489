//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Container engine orchestration
//! - Errors: Domain-specific errors
//! - Messaging: Command routing and reply formatting

pub mod errors;
pub mod services;
pub mod messaging;

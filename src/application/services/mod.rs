//! Application services - Container engine orchestration

pub mod container_service;
pub mod log_excerpt;

pub use container_service::{ActionOutcome, ContainerService, LifecycleAction, LogsOutcome};

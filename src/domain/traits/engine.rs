use std::time::Duration;

use async_trait::async_trait;
use crate::domain::entities::ContainerSummary;
use crate::application::errors::EngineError;

/// Container engine port.
///
/// Implementations talk to the engine; deadlines are applied by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// List every container, stopped ones included
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError>;

    async fn start_container(&self, id: &str) -> Result<(), EngineError>;

    /// Stop, letting the engine kill the container once `grace` elapses
    async fn stop_container(&self, id: &str, grace: Duration) -> Result<(), EngineError>;

    async fn restart_container(&self, id: &str, grace: Duration) -> Result<(), EngineError>;

    /// Last `tail` lines of combined stdout/stderr with timestamps, in the
    /// engine's multiplexed wire format (8-byte header per frame).
    async fn container_logs(&self, id: &str, tail: usize) -> Result<Vec<u8>, EngineError>;
}

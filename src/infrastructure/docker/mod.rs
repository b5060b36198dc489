//! Docker engine adapter built on Bollard

use std::time::Duration;

use async_trait::async_trait;
use bollard::container::LogOutput;
use bollard::errors::Error as BollardError;
use bollard::query_parameters::{
    ListContainersOptionsBuilder, LogsOptionsBuilder, RestartContainerOptionsBuilder,
    StartContainerOptions, StopContainerOptionsBuilder,
};
use bollard::{Docker, API_DEFAULT_VERSION};
use futures_util::TryStreamExt;

use crate::application::errors::EngineError;
use crate::domain::entities::{ContainerState, ContainerSummary};
use crate::domain::traits::ContainerEngine;

/// Connection timeout in seconds for engine API requests
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Stream identifiers used in multiplexed log frame headers
const STDIN_STREAM: u8 = 0;
const STDOUT_STREAM: u8 = 1;
const STDERR_STREAM: u8 = 2;

/// How an endpoint string should be dialled
#[derive(Debug, PartialEq, Eq)]
enum Endpoint {
    /// Unix socket or Windows named pipe URI
    Socket(String),
    /// HTTP endpoint; `tcp://` is rewritten to `http://`
    Http(String),
}

impl Endpoint {
    fn classify(host: &str) -> Self {
        if host.starts_with("unix://") || host.starts_with("npipe://") {
            Endpoint::Socket(host.to_string())
        } else if let Some(rest) = host.strip_prefix("tcp://") {
            Endpoint::Http(format!("http://{}", rest))
        } else if host.starts_with("http://") || host.starts_with("https://") {
            Endpoint::Http(host.to_string())
        } else if host.starts_with("\\\\") || host.starts_with("//") {
            Endpoint::Socket(format!("npipe://{}", host))
        } else {
            Endpoint::Socket(format!("unix://{}", host))
        }
    }
}

/// Container engine reached through the Docker API
#[derive(Clone)]
pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    /// Build a client for `host`, or from `DOCKER_HOST` and the platform
    /// default socket when no host is configured.
    ///
    /// No request is made; an unreachable engine only surfaces on first use.
    pub fn connect(host: Option<&str>) -> Result<Self, EngineError> {
        let docker = match host.filter(|h| !h.is_empty()).map(Endpoint::classify) {
            None => Docker::connect_with_defaults(),
            Some(Endpoint::Socket(uri)) => {
                Docker::connect_with_socket(&uri, CONNECTION_TIMEOUT_SECS, API_DEFAULT_VERSION)
            }
            Some(Endpoint::Http(url)) => {
                Docker::connect_with_http(&url, CONNECTION_TIMEOUT_SECS, API_DEFAULT_VERSION)
            }
        }
        .map_err(|e| EngineError::Connection(e.to_string()))?;

        Ok(Self { docker })
    }

    /// Agree on an API version with the engine, keeping the client default
    /// when the engine cannot be asked.
    pub async fn negotiate_version(self) -> Self {
        match self.docker.clone().negotiate_version().await {
            Ok(docker) => Self { docker },
            Err(e) => {
                tracing::warn!(error = %e, "API version negotiation failed, using client default");
                self
            }
        }
    }
}

fn engine_error(operation: &'static str, err: BollardError) -> EngineError {
    match err {
        BollardError::SocketNotFoundError(_) | BollardError::IOError { .. } => {
            EngineError::Connection(err.to_string())
        }
        other => EngineError::request(operation, other),
    }
}

fn grace_secs(grace: Duration) -> i32 {
    i32::try_from(grace.as_secs()).unwrap_or(i32::MAX)
}

fn summary_from(container: bollard::models::ContainerSummary) -> ContainerSummary {
    ContainerSummary {
        id: container.id.unwrap_or_default(),
        names: container.names.unwrap_or_default(),
        state: container
            .state
            .map(|s| ContainerState::from_engine(&s.to_string()))
            .unwrap_or(ContainerState::Unknown),
        status: container.status.unwrap_or_default(),
        image: container.image.unwrap_or_default(),
    }
}

/// Re-encode a demultiplexed chunk in the engine's wire format.
///
/// Stream chunks get the 8-byte header (stream id, three zero bytes, big-endian
/// payload length); TTY output has no framing on the wire and is copied as is.
fn encode_frame(out: &mut Vec<u8>, output: LogOutput) {
    let stream = match &output {
        LogOutput::StdIn { .. } => Some(STDIN_STREAM),
        LogOutput::StdOut { .. } => Some(STDOUT_STREAM),
        LogOutput::StdErr { .. } => Some(STDERR_STREAM),
        LogOutput::Console { .. } => None,
    };
    let payload = output.into_bytes();

    if let Some(stream) = stream {
        out.extend_from_slice(&[stream, 0, 0, 0]);
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    }
    out.extend_from_slice(&payload);
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let options = ListContainersOptionsBuilder::new().all(true).build();
        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| engine_error("list", e))?;

        Ok(containers.into_iter().map(summary_from).collect())
    }

    async fn start_container(&self, id: &str) -> Result<(), EngineError> {
        self.docker
            .start_container(id, None::<StartContainerOptions>)
            .await
            .map_err(|e| engine_error("start", e))
    }

    async fn stop_container(&self, id: &str, grace: Duration) -> Result<(), EngineError> {
        let options = StopContainerOptionsBuilder::new().t(grace_secs(grace)).build();
        self.docker
            .stop_container(id, Some(options))
            .await
            .map_err(|e| engine_error("stop", e))
    }

    async fn restart_container(&self, id: &str, grace: Duration) -> Result<(), EngineError> {
        let options = RestartContainerOptionsBuilder::new().t(grace_secs(grace)).build();
        self.docker
            .restart_container(id, Some(options))
            .await
            .map_err(|e| engine_error("restart", e))
    }

    async fn container_logs(&self, id: &str, tail: usize) -> Result<Vec<u8>, EngineError> {
        let options = LogsOptionsBuilder::new()
            .stdout(true)
            .stderr(true)
            .timestamps(true)
            .tail(&tail.to_string())
            .build();

        let outputs: Vec<LogOutput> = self
            .docker
            .logs(id, Some(options))
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| engine_error("logs", e))?;

        let mut raw = Vec::new();
        for output in outputs {
            encode_frame(&mut raw, output);
        }
        Ok(raw)
    }
}

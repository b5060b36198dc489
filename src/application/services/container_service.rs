//! Container lifecycle operations on top of a [`ContainerEngine`].
//!
//! Every operation lists containers afresh, resolves its target, and runs
//! under one deadline shared by the lookup and the action. Engine failures
//! are logged here and surfaced as typed outcomes, never as errors.

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use crate::application::errors::EngineError;
use crate::application::services::log_excerpt::LogExcerpt;
use crate::domain::entities::{find_container, ContainerSummary};
use crate::domain::traits::ContainerEngine;

pub const LIST_DEADLINE: Duration = Duration::from_secs(30);
pub const START_DEADLINE: Duration = Duration::from_secs(30);
pub const STOP_DEADLINE: Duration = Duration::from_secs(30);
pub const RESTART_DEADLINE: Duration = Duration::from_secs(60);
pub const LOGS_DEADLINE: Duration = Duration::from_secs(30);

/// Grace period the engine waits before killing a stopping container
pub const STOP_GRACE: Duration = Duration::from_secs(10);
pub const RESTART_GRACE: Duration = Duration::from_secs(30);

/// Lifecycle operations addressable by container name or id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Start,
    Stop,
    Restart,
}

impl LifecycleAction {
    pub fn verb(&self) -> &'static str {
        match self {
            LifecycleAction::Start => "start",
            LifecycleAction::Stop => "stop",
            LifecycleAction::Restart => "restart",
        }
    }

    fn deadline(&self) -> Duration {
        match self {
            LifecycleAction::Start => START_DEADLINE,
            LifecycleAction::Stop => STOP_DEADLINE,
            LifecycleAction::Restart => RESTART_DEADLINE,
        }
    }

    /// The container is already where the action would take it
    fn is_noop_for(&self, container: &ContainerSummary) -> bool {
        match self {
            LifecycleAction::Start => container.is_running(),
            LifecycleAction::Stop => !container.is_running(),
            LifecycleAction::Restart => false,
        }
    }
}

/// Result of a start, stop or restart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// Start on a running container, or stop on a stopped one
    AlreadyInState,
    NotFound,
    LookupFailed,
    Failed,
}

/// Result of a logs request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogsOutcome {
    Found(LogExcerpt),
    Empty,
    NotFound,
    LookupFailed,
    Failed,
}

/// One deadline spanning every engine call of a single request
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, EngineError>>,
    {
        match timeout_at(self.at, call).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout {
                operation,
                after: self.budget,
            }),
        }
    }
}

/// Engine gateway used by the command handlers
pub struct ContainerService<E: ContainerEngine> {
    engine: E,
}

impl<E: ContainerEngine> ContainerService<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// List every container, stopped ones included
    pub async fn list(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let deadline = Deadline::after(LIST_DEADLINE);
        deadline
            .run("list", self.engine.list_containers())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to list containers"))
    }

    /// Run a lifecycle action against the container answering to `target`
    pub async fn apply(&self, action: LifecycleAction, target: &str) -> ActionOutcome {
        let deadline = Deadline::after(action.deadline());

        let container = match self.locate(&deadline, target).await {
            Ok(Some(container)) => container,
            Ok(None) => return ActionOutcome::NotFound,
            Err(_) => return ActionOutcome::LookupFailed,
        };

        if action.is_noop_for(&container) {
            return ActionOutcome::AlreadyInState;
        }

        let id = container.id.as_str();
        let result = match action {
            LifecycleAction::Start => {
                deadline.run("start", self.engine.start_container(id)).await
            }
            LifecycleAction::Stop => {
                deadline.run("stop", self.engine.stop_container(id, STOP_GRACE)).await
            }
            LifecycleAction::Restart => {
                deadline
                    .run("restart", self.engine.restart_container(id, RESTART_GRACE))
                    .await
            }
        };

        match result {
            Ok(()) => {
                tracing::info!(container = target, "Container {} succeeded", action.verb());
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(container = target, error = %e, "Failed to {} container", action.verb());
                ActionOutcome::Failed
            }
        }
    }

    /// Fetch the last `lines` log lines of the container answering to `target`
    pub async fn logs(&self, target: &str, lines: usize) -> LogsOutcome {
        let deadline = Deadline::after(LOGS_DEADLINE);

        let container = match self.locate(&deadline, target).await {
            Ok(Some(container)) => container,
            Ok(None) => return LogsOutcome::NotFound,
            Err(_) => return LogsOutcome::LookupFailed,
        };

        let raw = match deadline
            .run("logs", self.engine.container_logs(&container.id, lines))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(container = target, error = %e, "Failed to get container logs");
                return LogsOutcome::Failed;
            }
        };

        let excerpt = LogExcerpt::extract(&raw, lines);
        if excerpt.is_empty() {
            LogsOutcome::Empty
        } else {
            LogsOutcome::Found(excerpt)
        }
    }

    async fn locate(
        &self,
        deadline: &Deadline,
        target: &str,
    ) -> Result<Option<ContainerSummary>, EngineError> {
        let containers = deadline
            .run("list", self.engine.list_containers())
            .await
            .inspect_err(|e| {
                tracing::error!(container = target, error = %e, "Failed to list containers")
            })?;

        Ok(find_container(&containers, target).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ContainerState;
    use crate::domain::traits::MockContainerEngine;
    use async_trait::async_trait;
    use rstest::rstest;

    const WEB_ID: &str = "abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";

    fn web(state: ContainerState) -> ContainerSummary {
        ContainerSummary::new(WEB_ID, "/web", state)
            .with_status("Up 5 minutes")
            .with_image("nginx:latest")
    }

    fn engine_listing(containers: Vec<ContainerSummary>) -> MockContainerEngine {
        let mut engine = MockContainerEngine::new();
        engine
            .expect_list_containers()
            .times(1)
            .returning(move || Ok(containers.clone()));
        engine
    }

    fn framed(lines: &[&str]) -> Vec<u8> {
        let mut out = Vec::new();
        for line in lines {
            let payload = format!("{line}\n");
            out.extend_from_slice(&[2, 0, 0, 0]);
            out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            out.extend_from_slice(payload.as_bytes());
        }
        out
    }

    #[tokio::test]
    async fn start_skips_engine_when_already_running() {
        let mut engine = engine_listing(vec![web(ContainerState::Running)]);
        engine.expect_start_container().never();

        let service = ContainerService::new(engine);
        assert_eq!(service.apply(LifecycleAction::Start, "web").await, ActionOutcome::AlreadyInState);
    }

    #[tokio::test]
    async fn start_uses_full_id() {
        let mut engine = engine_listing(vec![web(ContainerState::Exited)]);
        engine
            .expect_start_container()
            .withf(|id| id == WEB_ID)
            .times(1)
            .returning(|_| Ok(()));

        let service = ContainerService::new(engine);
        assert_eq!(service.apply(LifecycleAction::Start, "abcdef123456").await, ActionOutcome::Completed);
    }

    #[rstest]
    #[case(ContainerState::Exited)]
    #[case(ContainerState::Paused)]
    #[case(ContainerState::Created)]
    #[tokio::test]
    async fn stop_skips_engine_when_not_running(#[case] state: ContainerState) {
        let mut engine = engine_listing(vec![web(state)]);
        engine.expect_stop_container().never();

        let service = ContainerService::new(engine);
        assert_eq!(service.apply(LifecycleAction::Stop, "web").await, ActionOutcome::AlreadyInState);
    }

    #[tokio::test]
    async fn stop_passes_grace_period() {
        let mut engine = engine_listing(vec![web(ContainerState::Running)]);
        engine
            .expect_stop_container()
            .withf(|id, grace| id == WEB_ID && *grace == STOP_GRACE)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ContainerService::new(engine);
        assert_eq!(service.apply(LifecycleAction::Stop, "web").await, ActionOutcome::Completed);
    }

    #[tokio::test]
    async fn restart_has_no_state_precheck() {
        let mut engine = engine_listing(vec![web(ContainerState::Exited)]);
        engine
            .expect_restart_container()
            .withf(|id, grace| id == WEB_ID && *grace == RESTART_GRACE)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ContainerService::new(engine);
        assert_eq!(service.apply(LifecycleAction::Restart, "web").await, ActionOutcome::Completed);
    }

    #[tokio::test]
    async fn engine_failure_is_reported_as_failed() {
        let mut engine = engine_listing(vec![web(ContainerState::Running)]);
        engine
            .expect_restart_container()
            .returning(|_, _| Err(EngineError::request("restart", "conflict")));

        let service = ContainerService::new(engine);
        assert_eq!(service.apply(LifecycleAction::Restart, "web").await, ActionOutcome::Failed);
    }

    #[rstest]
    #[case(LifecycleAction::Start)]
    #[case(LifecycleAction::Stop)]
    #[case(LifecycleAction::Restart)]
    #[tokio::test]
    async fn missing_container_is_not_found(#[case] action: LifecycleAction) {
        let engine = engine_listing(vec![web(ContainerState::Running)]);
        let service = ContainerService::new(engine);
        assert_eq!(service.apply(action, "nonexistent").await, ActionOutcome::NotFound);
    }

    #[tokio::test]
    async fn listing_failure_is_a_lookup_failure() {
        let mut engine = MockContainerEngine::new();
        engine
            .expect_list_containers()
            .returning(|| Err(EngineError::Connection("socket closed".into())));
        engine.expect_start_container().never();

        let service = ContainerService::new(engine);
        assert_eq!(service.apply(LifecycleAction::Start, "web").await, ActionOutcome::LookupFailed);
    }

    #[tokio::test]
    async fn logs_requests_tail_and_extracts_lines() {
        let mut engine = engine_listing(vec![web(ContainerState::Running)]);
        engine
            .expect_container_logs()
            .withf(|id, tail| id == WEB_ID && *tail == 5)
            .times(1)
            .returning(|_, _| Ok(framed(&["l1", "l2", "l3", "l4", "l5"])));

        let service = ContainerService::new(engine);
        match service.logs("web", 5).await {
            LogsOutcome::Found(excerpt) => {
                assert_eq!(excerpt.line_count, 5);
                assert_eq!(excerpt.text, "l1\nl2\nl3\nl4\nl5\n");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn logs_without_payload_are_empty() {
        let mut engine = engine_listing(vec![web(ContainerState::Exited)]);
        engine.expect_container_logs().returning(|_, _| Ok(Vec::new()));

        let service = ContainerService::new(engine);
        assert_eq!(service.logs("web", 10).await, LogsOutcome::Empty);
    }

    #[tokio::test]
    async fn logs_failure_is_reported() {
        let mut engine = engine_listing(vec![web(ContainerState::Running)]);
        engine
            .expect_container_logs()
            .returning(|_, _| Err(EngineError::request("logs", "gone")));

        let service = ContainerService::new(engine);
        assert_eq!(service.logs("web", 10).await, LogsOutcome::Failed);
    }

    /// Engine that answers every call after a fixed delay
    struct SlowEngine {
        listing: Duration,
        action: Duration,
    }

    impl SlowEngine {
        fn new(listing: u64, action: u64) -> Self {
            Self {
                listing: Duration::from_secs(listing),
                action: Duration::from_secs(action),
            }
        }
    }

    #[async_trait]
    impl ContainerEngine for SlowEngine {
        async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
            tokio::time::sleep(self.listing).await;
            Ok(vec![web(ContainerState::Exited)])
        }

        async fn start_container(&self, _id: &str) -> Result<(), EngineError> {
            tokio::time::sleep(self.action).await;
            Ok(())
        }

        async fn stop_container(&self, _id: &str, _grace: Duration) -> Result<(), EngineError> {
            tokio::time::sleep(self.action).await;
            Ok(())
        }

        async fn restart_container(&self, _id: &str, _grace: Duration) -> Result<(), EngineError> {
            tokio::time::sleep(self.action).await;
            Ok(())
        }

        async fn container_logs(&self, _id: &str, _tail: usize) -> Result<Vec<u8>, EngineError> {
            tokio::time::sleep(self.action).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn list_times_out_at_deadline() {
        let service = ContainerService::new(SlowEngine::new(3600, 0));
        let err = service.list().await.unwrap_err();
        assert_eq!(
            err,
            EngineError::Timeout {
                operation: "list",
                after: LIST_DEADLINE
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restart_lookup_times_out() {
        let service = ContainerService::new(SlowEngine::new(3600, 0));
        assert_eq!(service.apply(LifecycleAction::Restart, "web").await, ActionOutcome::LookupFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_tolerates_slow_listing_within_its_minute() {
        let service = ContainerService::new(SlowEngine::new(45, 0));
        assert_eq!(service.apply(LifecycleAction::Restart, "web").await, ActionOutcome::Completed);
    }

    #[rstest]
    #[case(LifecycleAction::Start)]
    #[case(LifecycleAction::Stop)]
    #[tokio::test(start_paused = true)]
    async fn slow_listing_exceeds_thirty_second_deadline(#[case] action: LifecycleAction) {
        let service = ContainerService::new(SlowEngine::new(45, 0));
        assert_eq!(service.apply(action, "web").await, ActionOutcome::LookupFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn logs_lookup_exceeds_thirty_second_deadline() {
        let service = ContainerService::new(SlowEngine::new(45, 0));
        assert_eq!(service.logs("web", 10).await, LogsOutcome::LookupFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_action_fails_after_lookup() {
        let service = ContainerService::new(SlowEngine::new(0, 3600));
        assert_eq!(service.apply(LifecycleAction::Start, "web").await, ActionOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_spans_lookup_and_action() {
        // 20s listing plus 20s start overruns the shared 30s budget
        let service = ContainerService::new(SlowEngine::new(20, 20));
        assert_eq!(service.apply(LifecycleAction::Start, "web").await, ActionOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_logs_fetch_fails_after_lookup() {
        let service = ContainerService::new(SlowEngine::new(0, 3600));
        assert_eq!(service.logs("web", 10).await, LogsOutcome::Failed);
    }
}

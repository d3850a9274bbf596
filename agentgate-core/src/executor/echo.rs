/// Echo executor for testing and demo tenants
///
/// A deterministic sample capability: it streams a single canned working
/// update, echoes the caller's input back as the `final_answer` artifact
/// and completes. It is the executor mounted for tenants without a real
/// capability, and the test double for the gateway pipeline.
///
/// # Event Sequence
///
/// 1. **submitted**
/// 2. **working** with the text "mock content"
/// 3. **artifact** `final_answer` echoing the input
/// 4. **completed** (final)
///
/// # Cancellation
///
/// The echo agent has no mid-flight work to stop, so `cancel` reports an
/// unsupported-operation error; the gateway forces the terminal state.

use crate::executor::{AgentExecutor, ExecutorError, ExecutorResult, RequestContext};
use crate::models::content::{Message, Part};
use crate::models::task::TaskState;
use crate::updater::TaskUpdater;
use async_trait::async_trait;

/// The canned agent behind the echo executor
struct EchoAgent;

impl EchoAgent {
    /// Produces the incremental chunks for one invocation
    async fn stream(&self, _query: &str) -> Vec<String> {
        vec!["mock content".to_string()]
    }
}

/// Echo executor implementation
pub struct EchoExecutor {
    agent: EchoAgent,
}

impl EchoExecutor {
    /// Creates a new echo executor
    pub fn new() -> Self {
        EchoExecutor { agent: EchoAgent }
    }
}

impl Default for EchoExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentExecutor for EchoExecutor {
    fn name(&self) -> &str {
        "echo"
    }

    async fn execute(
        &self,
        context: &RequestContext,
        updater: &TaskUpdater,
    ) -> ExecutorResult<()> {
        let query = context.user_input();
        tracing::info!(
            task_id = %context.task_id(),
            context_id = %context.context_id(),
            tenant_id = %context.tenant_id(),
            "Echo executor starting"
        );

        // Resumed tasks were submitted by an earlier execution
        if !updater.is_submitted().await {
            updater.submit().await?;
        }

        for chunk in self.agent.stream(&query).await {
            updater
                .update_status(TaskState::Working, Some(Message::agent_text(chunk)))
                .await?;
        }

        updater
            .add_artifact(vec![Part::text(query)], Some("final_answer".to_string()))
            .await?;

        updater.complete().await?;
        Ok(())
    }

    async fn cancel(
        &self,
        context: &RequestContext,
        _updater: &TaskUpdater,
    ) -> ExecutorResult<()> {
        tracing::warn!(
            task_id = %context.task_id(),
            "Echo executor asked to cancel"
        );
        Err(ExecutorError::Unsupported(
            "echo agent cannot cancel a running execution".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventQueue;
    use crate::store::{InMemoryTaskStore, TaskStore};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    async fn run_echo(input: &str) -> (Vec<crate::events::TaskEvent>, crate::models::task::Task) {
        let store = Arc::new(InMemoryTaskStore::new());
        let task = store.create(Uuid::new_v4()).await.unwrap();
        let (queue, consumer) = EventQueue::new();
        let updater = TaskUpdater::new(
            store.clone() as Arc<dyn TaskStore>,
            queue,
            task.id,
            task.context_id,
        );
        let context = RequestContext::new(
            task.id,
            task.context_id,
            "demo".to_string(),
            Message::user(vec![Part::text(input)]),
            None,
            CancellationToken::new(),
        );

        let executor = EchoExecutor::new();
        executor.execute(&context, &updater).await.unwrap();

        let events = consumer.collect_events().await;
        let stored = store.get(task.id).await.unwrap();
        (events, stored)
    }

    #[tokio::test]
    async fn test_execute_emits_canned_sequence() {
        let (events, task) = run_echo("hi").await;

        assert_eq!(events.len(), 4);
        assert_eq!(events[0].state(), Some(TaskState::Submitted));
        assert_eq!(events[1].state(), Some(TaskState::Working));
        assert_eq!(
            events[2].artifact().unwrap().name.as_deref(),
            Some("final_answer")
        );
        assert_eq!(events[3].state(), Some(TaskState::Completed));
        assert!(events[3].is_final);

        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[tokio::test]
    async fn test_working_update_carries_mock_content() {
        let (events, _task) = run_echo("hi").await;

        match &events[1].body {
            crate::events::TaskEventBody::StatusUpdate { status } => {
                let message = status.message.as_ref().unwrap();
                assert_eq!(message.text(), "mock content");
            }
            other => panic!("expected status update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_artifact_echoes_input() {
        let (events, task) = run_echo("echo me back").await;

        let artifact = events[2].artifact().unwrap();
        assert_eq!(artifact.parts, vec![Part::text("echo me back")]);
        assert_eq!(task.artifacts.len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_is_unsupported() {
        let store = Arc::new(InMemoryTaskStore::new());
        let task = store.create(Uuid::new_v4()).await.unwrap();
        let (queue, _consumer) = EventQueue::new();
        let updater = TaskUpdater::new(
            store as Arc<dyn TaskStore>,
            queue,
            task.id,
            task.context_id,
        );
        let context = RequestContext::new(
            task.id,
            task.context_id,
            "demo".to_string(),
            Message::user(vec![]),
            None,
            CancellationToken::new(),
        );

        let executor = EchoExecutor::new();
        let result = executor.cancel(&context, &updater).await;
        assert!(matches!(result, Err(ExecutorError::Unsupported(_))));
    }
}

/// Task updater
///
/// Stateful helper bound to one (task id, context id) pair for the
/// duration of one execution. It is the single writer for its task: every
/// status transition and artifact goes through it, which serializes store
/// writes and keeps the event queue in transition order.
///
/// # Contract
///
/// - `submit()` must be called exactly once, before any other method.
/// - `update_status`/`add_artifact` require a live (non-terminal) task.
/// - Exactly one of `complete`/`fail`/`cancel` succeeds; it emits the one
///   `final=true` event. Any later call is an `AlreadyTerminal` error,
///   never silently ignored.
/// - Event delivery is best-effort: a departed consumer never fails an
///   updater call. The store write is the durable record.
///
/// The updater is cheap to clone; clones share the same lock, so a racing
/// cancellation and a normal completion cannot both produce a terminal
/// event.

use crate::events::{EventQueue, TaskEvent};
use crate::models::content::{Artifact, Message, Part};
use crate::models::task::{TaskState, TaskStatus};
use crate::store::{StoreError, TaskStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Task updater error types
#[derive(Debug, thiserror::Error)]
pub enum UpdaterError {
    /// A method other than `submit` was called first
    #[error("task {0} has not been submitted")]
    NotSubmitted(Uuid),

    /// `submit` was called twice
    #[error("task {0} was already submitted")]
    AlreadySubmitted(Uuid),

    /// A terminal event was already emitted for this execution
    #[error("task {0} already reached a terminal state")]
    AlreadyTerminal(Uuid),

    /// The requested transition is not allowed by the state machine
    #[error("invalid task transition from {from} to {to}")]
    InvalidTransition { from: TaskState, to: TaskState },

    /// The task store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Updater result type alias
pub type UpdaterResult<T> = Result<T, UpdaterError>;

#[derive(Debug)]
struct UpdaterInner {
    submitted: bool,
    terminal: bool,
}

/// Single writer for one task execution
#[derive(Clone)]
pub struct TaskUpdater {
    task_id: Uuid,
    context_id: Uuid,
    store: Arc<dyn TaskStore>,
    queue: EventQueue,
    inner: Arc<Mutex<UpdaterInner>>,
}

impl TaskUpdater {
    /// Creates an updater for a freshly created task
    pub fn new(store: Arc<dyn TaskStore>, queue: EventQueue, task_id: Uuid, context_id: Uuid) -> Self {
        TaskUpdater {
            task_id,
            context_id,
            store,
            queue,
            inner: Arc::new(Mutex::new(UpdaterInner {
                submitted: false,
                terminal: false,
            })),
        }
    }

    /// Creates an updater bound to a task that was submitted in an
    /// earlier execution (resumption of a parked task, or a forced
    /// cancellation with no live execution)
    pub fn resumed(
        store: Arc<dyn TaskStore>,
        queue: EventQueue,
        task_id: Uuid,
        context_id: Uuid,
    ) -> Self {
        TaskUpdater {
            task_id,
            context_id,
            store,
            queue,
            inner: Arc::new(Mutex::new(UpdaterInner {
                submitted: true,
                terminal: false,
            })),
        }
    }

    /// The task this updater writes to
    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    /// The context the task belongs to
    pub fn context_id(&self) -> Uuid {
        self.context_id
    }

    /// Whether this execution has emitted its terminal event
    pub async fn is_terminal(&self) -> bool {
        self.inner.lock().await.terminal
    }

    /// Whether the task was submitted, in this execution or an earlier one
    ///
    /// Executors use this to skip `submit` when resuming a parked task.
    pub async fn is_submitted(&self) -> bool {
        self.inner.lock().await.submitted
    }

    /// Records the submitted status and emits the first event
    ///
    /// First call only; calling twice is an error.
    pub async fn submit(&self) -> UpdaterResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.terminal {
            return Err(UpdaterError::AlreadyTerminal(self.task_id));
        }
        if inner.submitted {
            return Err(UpdaterError::AlreadySubmitted(self.task_id));
        }

        let mut task = self.store.get(self.task_id).await?;
        let status = TaskStatus::new(TaskState::Submitted, None);
        task.apply_status(status.clone());
        self.store.save(task).await?;

        self.queue.enqueue(TaskEvent::status_update(
            self.task_id,
            self.context_id,
            status,
            false,
        ));
        inner.submitted = true;
        Ok(())
    }

    /// Transitions to a non-terminal state and emits a status event
    pub async fn update_status(
        &self,
        state: TaskState,
        message: Option<Message>,
    ) -> UpdaterResult<()> {
        let inner = self.inner.lock().await;
        self.check_live(&inner)?;

        let mut task = self.store.get(self.task_id).await?;
        // Terminal transitions go through complete/fail/cancel so the
        // final flag is set in exactly one place
        if state.is_terminal() || !task.status.state.can_transition_to(state) {
            return Err(UpdaterError::InvalidTransition {
                from: task.status.state,
                to: state,
            });
        }

        let status = TaskStatus::new(state, message);
        task.apply_status(status.clone());
        self.store.save(task).await?;

        self.queue.enqueue(TaskEvent::status_update(
            self.task_id,
            self.context_id,
            status,
            false,
        ));
        // Lock held across save and enqueue: transitions reach the store
        // and the queue in the same order
        drop(inner);
        Ok(())
    }

    /// Appends a named artifact without changing status
    pub async fn add_artifact(&self, parts: Vec<Part>, name: Option<String>) -> UpdaterResult<()> {
        let inner = self.inner.lock().await;
        self.check_live(&inner)?;

        let artifact = Artifact::new(name, parts);
        let mut task = self.store.get(self.task_id).await?;
        task.add_artifact(artifact.clone());
        self.store.save(task).await?;

        self.queue.enqueue(TaskEvent::artifact_update(
            self.task_id,
            self.context_id,
            artifact,
        ));
        Ok(())
    }

    /// Transitions to `completed` and emits the final event
    pub async fn complete(&self) -> UpdaterResult<()> {
        self.finalize(TaskState::Completed, None).await
    }

    /// Transitions to `failed` with a message and emits the final event
    pub async fn fail(&self, message: impl Into<String>) -> UpdaterResult<()> {
        self.finalize(TaskState::Failed, Some(Message::agent_text(message.into())))
            .await
    }

    /// Transitions to `canceled` and emits the final event
    pub async fn cancel(&self) -> UpdaterResult<()> {
        self.finalize(TaskState::Canceled, None).await
    }

    async fn finalize(&self, state: TaskState, message: Option<Message>) -> UpdaterResult<()> {
        let mut inner = self.inner.lock().await;
        self.check_live(&inner)?;

        let mut task = self.store.get(self.task_id).await?;
        if !task.status.state.can_transition_to(state) {
            // The store already holds a terminal state written by another
            // execution of this task
            return Err(UpdaterError::AlreadyTerminal(self.task_id));
        }

        let status = TaskStatus::new(state, message);
        task.apply_status(status.clone());
        self.store.save(task).await?;

        self.queue.enqueue(TaskEvent::status_update(
            self.task_id,
            self.context_id,
            status,
            true,
        ));
        inner.terminal = true;

        tracing::info!(
            task_id = %self.task_id,
            context_id = %self.context_id,
            state = %state,
            "Task reached terminal state"
        );
        Ok(())
    }

    fn check_live(&self, inner: &UpdaterInner) -> UpdaterResult<()> {
        if !inner.submitted {
            return Err(UpdaterError::NotSubmitted(self.task_id));
        }
        if inner.terminal {
            return Err(UpdaterError::AlreadyTerminal(self.task_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTaskStore;

    async fn setup() -> (Arc<InMemoryTaskStore>, TaskUpdater, crate::events::EventConsumer) {
        let store = Arc::new(InMemoryTaskStore::new());
        let task = store.create(Uuid::new_v4()).await.unwrap();
        let (queue, consumer) = EventQueue::new();
        let updater = TaskUpdater::new(store.clone(), queue, task.id, task.context_id);
        (store, updater, consumer)
    }

    #[tokio::test]
    async fn test_methods_before_submit_are_errors() {
        let (_store, updater, _consumer) = setup().await;

        assert!(matches!(
            updater.update_status(TaskState::Working, None).await,
            Err(UpdaterError::NotSubmitted(_))
        ));
        assert!(matches!(
            updater.add_artifact(vec![Part::text("x")], None).await,
            Err(UpdaterError::NotSubmitted(_))
        ));
        assert!(matches!(
            updater.complete().await,
            Err(UpdaterError::NotSubmitted(_))
        ));
    }

    #[tokio::test]
    async fn test_double_submit_is_an_error() {
        let (_store, updater, _consumer) = setup().await;

        updater.submit().await.unwrap();
        assert!(matches!(
            updater.submit().await,
            Err(UpdaterError::AlreadySubmitted(_))
        ));
    }

    #[tokio::test]
    async fn test_full_lifecycle_emits_ordered_events_with_one_final() {
        let (store, updater, consumer) = setup().await;
        let task_id = updater.task_id();

        updater.submit().await.unwrap();
        updater
            .update_status(TaskState::Working, Some(Message::agent_text("working on it")))
            .await
            .unwrap();
        updater
            .add_artifact(vec![Part::text("result")], Some("answer".to_string()))
            .await
            .unwrap();
        updater.complete().await.unwrap();

        let events = consumer.collect_events().await;
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].state(), Some(TaskState::Submitted));
        assert_eq!(events[1].state(), Some(TaskState::Working));
        assert!(events[2].artifact().is_some());
        assert_eq!(events[3].state(), Some(TaskState::Completed));

        let finals = events.iter().filter(|e| e.is_final).count();
        assert_eq!(finals, 1);
        assert!(events.last().unwrap().is_final);

        let task = store.get(task_id).await.unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.history.len(), 3);
        assert_eq!(task.artifacts.len(), 1);
    }

    #[tokio::test]
    async fn test_terminal_methods_are_mutually_exclusive() {
        let (_store, updater, _consumer) = setup().await;

        updater.submit().await.unwrap();
        updater.cancel().await.unwrap();

        // A racing late complete must be rejected, not absorbed
        assert!(matches!(
            updater.complete().await,
            Err(UpdaterError::AlreadyTerminal(_))
        ));
        assert!(matches!(
            updater.fail("too late").await,
            Err(UpdaterError::AlreadyTerminal(_))
        ));
        assert!(matches!(
            updater.update_status(TaskState::Working, None).await,
            Err(UpdaterError::AlreadyTerminal(_))
        ));
    }

    #[tokio::test]
    async fn test_update_status_rejects_terminal_targets() {
        let (_store, updater, _consumer) = setup().await;

        updater.submit().await.unwrap();
        assert!(matches!(
            updater.update_status(TaskState::Completed, None).await,
            Err(UpdaterError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_working_and_input_required_alternate() {
        let (store, updater, _consumer) = setup().await;

        updater.submit().await.unwrap();
        updater.update_status(TaskState::Working, None).await.unwrap();
        updater
            .update_status(TaskState::InputRequired, None)
            .await
            .unwrap();
        updater.update_status(TaskState::Working, None).await.unwrap();
        updater.complete().await.unwrap();

        let task = store.get(updater.task_id()).await.unwrap();
        let states: Vec<TaskState> = task.history.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![
                TaskState::Submitted,
                TaskState::Working,
                TaskState::InputRequired,
                TaskState::Working,
                TaskState::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn test_lifecycle_survives_dropped_consumer() {
        let (store, updater, consumer) = setup().await;
        drop(consumer);

        // Every transition must still succeed and reach the store
        updater.submit().await.unwrap();
        updater
            .update_status(TaskState::Working, Some(Message::agent_text("still going")))
            .await
            .unwrap();
        updater
            .add_artifact(vec![Part::text("result")], Some("answer".to_string()))
            .await
            .unwrap();
        updater.complete().await.unwrap();

        let task = store.get(updater.task_id()).await.unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.history.len(), 3);
        assert_eq!(task.artifacts.len(), 1);
    }

    #[tokio::test]
    async fn test_resumed_updater_cannot_double_finalize_stored_task() {
        let store = Arc::new(InMemoryTaskStore::new());
        let task = store.create(Uuid::new_v4()).await.unwrap();

        let (queue, _consumer) = EventQueue::new();
        let first = TaskUpdater::new(
            store.clone() as Arc<dyn TaskStore>,
            queue,
            task.id,
            task.context_id,
        );
        first.submit().await.unwrap();
        first.cancel().await.unwrap();

        // A second execution bound to the same task sees the stored
        // terminal state even though its own flag is fresh
        let (queue, _consumer) = EventQueue::new();
        let second = TaskUpdater::resumed(
            store.clone() as Arc<dyn TaskStore>,
            queue,
            task.id,
            task.context_id,
        );
        assert!(matches!(
            second.complete().await,
            Err(UpdaterError::AlreadyTerminal(_))
        ));
    }
}

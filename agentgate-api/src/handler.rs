/// Request handler: the protocol-facing execution driver
///
/// One submission produces one task execution: the handler resolves or
/// creates the task, wires up the event queue and the single-writer
/// updater, and drives the tenant's executor on a detached tokio task so
/// the caller can consume events over either transport (blocking send or
/// SSE stream) while the execution runs.
///
/// Failure policy: raw executor error text never reaches the wire. The
/// full error is logged server-side and the task is failed with one of
/// the sanitized messages below. A cancellation racing a normal
/// completion resolves to whichever terminal event the updater accepted
/// first; the loser is logged and dropped.

use crate::error::{ApiError, ApiResult};
use crate::mounts::{ActiveExecution, TenantMount};
use agentgate_core::events::{EventConsumer, EventQueue};
use agentgate_core::executor::{ExecutorError, RequestContext};
use agentgate_core::models::content::Message;
use agentgate_core::models::task::Task;
use agentgate_core::updater::{TaskUpdater, UpdaterError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Wire message for executions stopped by the deadline
pub const TIMEOUT_MESSAGE: &str = "Task execution timed out";

/// Wire message for executions stopped by an executor error
pub const FAILURE_MESSAGE: &str = "Agent execution failed due to an internal error";

/// Smallest accepted execution deadline
pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Largest accepted execution deadline
pub const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// One validated message submission
pub struct Submission {
    /// The caller's message
    pub message: Message,

    /// Existing task to resume; `None` creates a fresh task
    pub task_id: Option<Uuid>,

    /// Context to attach a fresh task to; `None` opens a new context
    pub context_id: Option<Uuid>,

    /// Per-request deadline override
    pub timeout: Option<Duration>,
}

/// Accepts a submission and starts its execution
///
/// Returns the task snapshot taken before the executor runs, plus the
/// consumer end of the execution's event queue. The execution itself is
/// detached: dropping the consumer does not stop it.
pub async fn submit_task(
    mount: Arc<TenantMount>,
    submission: Submission,
    api_key: Option<String>,
) -> ApiResult<(Task, EventConsumer)> {
    if submission.message.is_empty() {
        return Err(ApiError::BadRequest(
            "Message must contain at least one non-empty text part".to_string(),
        ));
    }

    let store = mount.store();
    let (queue, consumer) = EventQueue::new();

    let (task, updater) = match submission.task_id {
        Some(task_id) => {
            let task = store.get(task_id).await?;
            if task.status.state.is_terminal() {
                return Err(ApiError::BadRequest(format!(
                    "Task {} already reached a terminal state and cannot accept new messages",
                    task_id
                )));
            }
            if mount.active_execution(task_id).await.is_some() {
                return Err(ApiError::Conflict(format!(
                    "Task {} already has a live execution",
                    task_id
                )));
            }
            let updater =
                TaskUpdater::resumed(store.clone(), queue, task.id, task.context_id);
            (task, updater)
        }
        None => {
            let context_id = submission.context_id.unwrap_or_else(Uuid::new_v4);
            let task = store.create(context_id).await?;
            let updater = TaskUpdater::new(store.clone(), queue, task.id, task.context_id);
            (task, updater)
        }
    };

    let deadline = submission
        .timeout
        .unwrap_or_else(|| mount.default_timeout())
        .clamp(MIN_TIMEOUT, MAX_TIMEOUT);

    let cancel_token = CancellationToken::new();
    let context = RequestContext::new(
        task.id,
        task.context_id,
        mount.tenant_id().to_string(),
        submission.message,
        api_key,
        cancel_token.clone(),
    );

    mount
        .register_active(
            task.id,
            ActiveExecution {
                updater: updater.clone(),
                cancel_token,
            },
        )
        .await;

    tokio::spawn(drive_execution(mount, context, updater, deadline));

    Ok((task, consumer))
}

/// Drives one execution to its terminal event
///
/// Runs the executor under the deadline, converts every non-terminal
/// outcome into a sanitized terminal event, and unregisters the
/// execution when done.
async fn drive_execution(
    mount: Arc<TenantMount>,
    context: RequestContext,
    updater: TaskUpdater,
    deadline: Duration,
) {
    let executor = mount.executor();
    let task_id = context.task_id();

    let outcome = tokio::select! {
        result = executor.execute(&context, &updater) => Some(result),
        _ = tokio::time::sleep(deadline) => None,
    };

    match outcome {
        Some(Ok(())) => {
            if !updater.is_terminal().await {
                tracing::error!(
                    task_id = %task_id,
                    executor = executor.name(),
                    "Executor returned without emitting a terminal event"
                );
                force_fail(&updater, FAILURE_MESSAGE).await;
            }
        }
        Some(Err(ExecutorError::Updater(UpdaterError::AlreadyTerminal(_)))) => {
            // Lost a race against a cancel request; the terminal event
            // was already emitted
            tracing::debug!(task_id = %task_id, "Execution superseded by a terminal event");
        }
        Some(Err(err)) => {
            tracing::error!(
                task_id = %task_id,
                executor = executor.name(),
                error = %err,
                "Agent execution failed"
            );
            force_fail(&updater, FAILURE_MESSAGE).await;
        }
        None => {
            tracing::warn!(
                task_id = %task_id,
                deadline_s = deadline.as_secs(),
                "Execution deadline expired"
            );
            context.cancel();
            if let Err(err) = executor.cancel(&context, &updater).await {
                tracing::debug!(task_id = %task_id, error = %err, "Cancel after timeout refused");
            }
            force_fail(&updater, TIMEOUT_MESSAGE).await;
        }
    }

    mount.finish_active(task_id).await;
}

/// Fails the task with a sanitized message unless already terminal
async fn force_fail(updater: &TaskUpdater, message: &str) {
    if updater.is_terminal().await {
        return;
    }
    match updater.fail(message).await {
        Ok(()) | Err(UpdaterError::AlreadyTerminal(_)) => {}
        Err(err) => {
            tracing::error!(
                task_id = %updater.task_id(),
                error = %err,
                "Failed to record terminal failure"
            );
        }
    }
}

/// Cancels a non-terminal task
///
/// Live executions get their cancellation token tripped and the executor
/// notified; if the executor refuses (or is already gone), the terminal
/// `canceled` transition is forced so the task never dangles. Returns the
/// task snapshot after cancellation.
pub async fn cancel_task(
    mount: Arc<TenantMount>,
    task_id: Uuid,
    api_key: Option<String>,
) -> ApiResult<Task> {
    let store = mount.store();
    let task = store.get(task_id).await?;
    if task.status.state.is_terminal() {
        return Err(ApiError::Conflict(format!(
            "Task {} already reached a terminal state",
            task_id
        )));
    }

    match mount.active_execution(task_id).await {
        Some(active) => {
            active.cancel_token.cancel();

            let context = RequestContext::new(
                task.id,
                task.context_id,
                mount.tenant_id().to_string(),
                Message::user(vec![]),
                api_key,
                active.cancel_token.clone(),
            );
            match mount.executor().cancel(&context, &active.updater).await {
                Ok(()) => {}
                Err(ExecutorError::Unsupported(reason)) => {
                    tracing::warn!(
                        task_id = %task_id,
                        reason = %reason,
                        "Executor cannot cancel; forcing terminal state"
                    );
                }
                Err(err) => {
                    tracing::error!(task_id = %task_id, error = %err, "Executor cancel failed");
                }
            }

            // Whatever the executor did, the task must end up terminal
            if !active.updater.is_terminal().await {
                match active.updater.cancel().await {
                    Ok(()) | Err(UpdaterError::AlreadyTerminal(_)) => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }
        None => {
            // Parked task (e.g. input-required) with no live execution.
            // The queue here has no transport consumer; it exists only to
            // satisfy the updater and is dropped after the transition.
            let (queue, _consumer) = EventQueue::new();
            let updater = TaskUpdater::resumed(store.clone(), queue, task.id, task.context_id);
            match updater.cancel().await {
                Ok(()) | Err(UpdaterError::AlreadyTerminal(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }

    let task = store.get(task_id).await?;
    Ok(task)
}

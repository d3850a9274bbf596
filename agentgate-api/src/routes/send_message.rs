/// Blocking message submission endpoint
///
/// Submits a message to a tenant's agent and blocks until the resulting
/// task execution reaches its terminal state, then returns the final
/// task snapshot with full history and artifacts.
///
/// # Endpoint
///
/// `POST /:tenant_id/message/send`
///
/// # Example Request
///
/// ```json
/// {
///   "message": {
///     "role": "user",
///     "parts": [{"kind": "text", "text": "hi"}]
///   },
///   "timeout_s": 120
/// }
/// ```
///
/// Pass `task_id` to resume a parked (input-required) task, and
/// `context_id` to group a fresh task with earlier ones.
///
/// # Errors
///
/// - 400 Bad Request: Empty message, or task already terminal
/// - 404 Not Found: Unknown tenant or task
/// - 409 Conflict: Task already has a live execution
/// - 422 Unprocessable Entity: Validation errors

use crate::app::AppState;
use crate::error::ApiError;
use crate::handler::{self, Submission};
use crate::routes::api_key;
use agentgate_core::models::content::Message;
use agentgate_core::models::task::Task;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

/// Message submission request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// The caller's message
    pub message: Message,

    /// Existing task to resume
    #[serde(default, rename = "taskId")]
    pub task_id: Option<Uuid>,

    /// Context to attach a fresh task to
    #[serde(default, rename = "contextId")]
    pub context_id: Option<Uuid>,

    /// Optional execution deadline in seconds (default: tenant setting)
    #[validate(range(min = 1, max = 86400))] // Max 24 hours
    pub timeout_s: Option<u64>,
}

impl SendMessageRequest {
    pub(crate) fn into_submission(self) -> Submission {
        Submission {
            message: self.message,
            task_id: self.task_id,
            context_id: self.context_id,
            timeout: self.timeout_s.map(Duration::from_secs),
        }
    }
}

/// Blocking message submission handler
pub async fn send_message(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Task>, ApiError> {
    request.validate()?;
    let mount = state.registry.resolve(&tenant_id)?;

    tracing::info!(
        tenant_id = %tenant_id,
        task_id = ?request.task_id,
        "Message submitted (blocking)"
    );

    let (task, consumer) =
        handler::submit_task(mount.clone(), request.into_submission(), api_key(&headers)).await?;

    // Drain the event queue to its terminal event, then return the
    // stored snapshot it produced
    consumer.collect_events().await;
    let task = mount.store().get(task.id).await?;
    Ok(Json(task))
}

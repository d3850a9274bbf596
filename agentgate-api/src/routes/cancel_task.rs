/// Task cancellation endpoint
///
/// Cancels a non-terminal task. For a live execution the cancellation
/// token is tripped and the executor notified; if the executor cannot
/// stop its work the gateway forces the terminal `canceled` transition
/// anyway. Parked tasks (e.g. waiting for input) are canceled directly.
///
/// # Endpoint
///
/// `POST /:tenant_id/tasks/:task_id/cancel`
///
/// # Errors
///
/// - 404 Not Found: Unknown tenant or task
/// - 409 Conflict: Task already reached a terminal state

use crate::app::AppState;
use crate::error::ApiResult;
use crate::handler;
use crate::routes::api_key;
use agentgate_core::models::task::Task;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use uuid::Uuid;

/// Task cancellation handler
pub async fn cancel_task(
    State(state): State<AppState>,
    Path((tenant_id, task_id)): Path<(String, Uuid)>,
    headers: HeaderMap,
) -> ApiResult<Json<Task>> {
    let mount = state.registry.resolve(&tenant_id)?;

    tracing::info!(
        tenant_id = %tenant_id,
        task_id = %task_id,
        "Cancel requested"
    );

    let task = handler::cancel_task(mount, task_id, api_key(&headers)).await?;
    Ok(Json(task))
}

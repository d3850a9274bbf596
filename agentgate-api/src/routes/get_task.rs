/// Task snapshot endpoint
///
/// Returns the stored snapshot of a task: current status, full status
/// history and accumulated artifacts. Useful after an SSE disconnect or
/// to poll a parked task.
///
/// # Endpoint
///
/// ```text
/// GET /:tenant_id/tasks/:task_id
/// ```
///
/// # Errors
///
/// - 404 Not Found: Unknown tenant, or no such task for this tenant

use crate::app::AppState;
use crate::error::ApiResult;
use agentgate_core::models::task::Task;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

/// Task snapshot handler
pub async fn get_task(
    State(state): State<AppState>,
    Path((tenant_id, task_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<Task>> {
    let mount = state.registry.resolve(&tenant_id)?;
    let task = mount.store().get(task_id).await?;
    Ok(Json(task))
}

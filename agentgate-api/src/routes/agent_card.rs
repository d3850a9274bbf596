/// Agent card discovery endpoint
///
/// Serves the static capability card for a mounted tenant. The card is
/// built once at mount time; this handler only clones it.
///
/// # Endpoint
///
/// ```text
/// GET /:tenant_id/.well-known/agent.json
/// ```
///
/// # Errors
///
/// - 404 Not Found: No agent mounted for the tenant

use crate::app::AppState;
use crate::error::ApiResult;
use agentgate_core::models::card::AgentCard;
use axum::{
    extract::{Path, State},
    Json,
};

/// Agent card handler
pub async fn agent_card(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> ApiResult<Json<AgentCard>> {
    let mount = state.registry.resolve(&tenant_id)?;
    Ok(Json(mount.card().clone()))
}

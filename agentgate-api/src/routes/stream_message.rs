/// Streaming message submission endpoint (SSE)
///
/// Submits a message and streams the execution's events in real time
/// using Server-Sent Events. The stream carries every queue event in
/// order and closes after the `final=true` event.
///
/// # Endpoint
///
/// `POST /:tenant_id/message/stream`
///
/// # SSE Event Format
///
/// ```text
/// event: task-event
/// data: {"taskId":"...","contextId":"...","final":false,"kind":"status-update","status":{...}}
/// ```
///
/// A keep-alive comment is sent every 25 seconds while the execution is
/// quiet. Disconnecting does not stop the execution; the task can be
/// polled afterwards via `GET /:tenant_id/tasks/:task_id`.

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::api_key;
use crate::routes::send_message::SendMessageRequest;
use crate::handler;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::StreamExt as _;
use validator::Validate;

/// Streaming message submission handler
pub async fn stream_message(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SendMessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    request.validate()?;
    let mount = state.registry.resolve(&tenant_id)?;

    tracing::info!(
        tenant_id = %tenant_id,
        task_id = ?request.task_id,
        "Message submitted (streaming)"
    );

    let (task, consumer) =
        handler::submit_task(mount, request.into_submission(), api_key(&headers)).await?;

    tracing::debug!(task_id = %task.id, "Streaming task events");

    let stream = consumer.map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(Event::default().event("task-event").data(data))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(25))))
}

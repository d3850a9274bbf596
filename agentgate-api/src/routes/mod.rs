/// API route handlers
///
/// This module contains all route handlers organized by endpoint:
///
/// - `health`: Health check endpoint
/// - `agent_card`: Published tenant capability card
/// - `send_message`: Blocking message submission
/// - `stream_message`: Streaming message submission (SSE)
/// - `get_task`: Task snapshot lookup
/// - `cancel_task`: Task cancellation

pub mod health;
pub mod agent_card;
pub mod send_message;
pub mod stream_message;
pub mod get_task;
pub mod cancel_task;

use axum::http::HeaderMap;

/// Header carrying the caller's opaque API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extracts the API key header, if the caller sent one
///
/// The gateway does not validate the key; it is passed through to the
/// executor as explicit per-call data.
pub(crate) fn api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

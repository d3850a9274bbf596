/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use agentgate_api::{app::AppState, config::Config, mounts::TenantRegistry};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let registry = TenantRegistry::from_config(&config);
/// let state = AppState::new(registry, config);
/// let app = agentgate_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, mounts::TenantRegistry};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Tenant mounting table, built once at startup
    pub registry: Arc<TenantRegistry>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(registry: TenantRegistry, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                  # Health check (public)
/// └── /:tenant_id/                             # Per-tenant surface
///     ├── GET  /.well-known/agent.json         # Capability card
///     ├── POST /message/send                   # Blocking submission
///     ├── POST /message/stream                 # Streaming submission (SSE)
///     ├── GET  /tasks/:task_id                 # Task snapshot
///     └── POST /tasks/:task_id/cancel          # Cancellation
/// ```
///
/// The tenant segment is resolved against the registry inside each
/// handler, so an unknown tenant is a 404 regardless of the suffix.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let tenant_routes = Router::new()
        .route(
            "/:tenant_id/.well-known/agent.json",
            get(routes::agent_card::agent_card),
        )
        .route(
            "/:tenant_id/message/send",
            post(routes::send_message::send_message),
        )
        .route(
            "/:tenant_id/message/stream",
            post(routes::stream_message::stream_message),
        )
        .route(
            "/:tenant_id/tasks/:task_id",
            get(routes::get_task::get_task),
        )
        .route(
            "/:tenant_id/tasks/:task_id/cancel",
            post(routes::cancel_task::cancel_task),
        );

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(routes::API_KEY_HEADER),
            ])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(tenant_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

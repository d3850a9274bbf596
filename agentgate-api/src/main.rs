//! # agentgate API Server
//!
//! The multi-tenant agent gateway server. Mounts one agent per configured
//! tenant and exposes the task-oriented message endpoints under each
//! tenant's path prefix.
//!
//! ## Usage
//!
//! ```bash
//! GATEWAY_TENANTS='["demo"]' cargo run -p agentgate-api
//! ```

use agentgate_api::{
    app::{build_router, AppState},
    config::Config,
    mounts::TenantRegistry,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agentgate_api=debug,agentgate_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "agentgate API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let registry = TenantRegistry::from_config(&config);
    tracing::info!(tenants = registry.len(), "Tenant registry built");

    let addr = format!("{}:{}", config.api.host, config.api.port);
    let state = AppState::new(registry, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Tenant mounts and the gateway routing table
///
/// A tenant mount binds one tenant identifier to its agent executor, its
/// exclusively-owned task store, its published capability card and its
/// default execution deadline. The registry is the gateway router's
/// mounting table: built once at startup from the configured tenant list,
/// never remounted at runtime, and consulted on every request to resolve
/// the tenant path prefix. Unknown identifiers resolve to a not-found
/// error before any task state is touched.

use crate::config::Config;
use crate::error::ApiError;
use agentgate_core::executor::{AgentExecutor, EchoExecutor};
use agentgate_core::models::card::{AgentCapabilities, AgentCard, AgentSkill};
use agentgate_core::store::{InMemoryTaskStore, TaskStore};
use agentgate_core::updater::TaskUpdater;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A live (not yet terminal) execution registered with its mount
#[derive(Clone)]
pub struct ActiveExecution {
    /// The single writer for the execution
    pub updater: TaskUpdater,

    /// Token cancelled on cancel requests and deadline expiry
    pub cancel_token: CancellationToken,
}

/// One mounted tenant
pub struct TenantMount {
    tenant_id: String,
    base_path: String,
    card: AgentCard,
    store: Arc<dyn TaskStore>,
    executor: Arc<dyn AgentExecutor>,
    default_timeout: Duration,
    active: Mutex<HashMap<Uuid, ActiveExecution>>,
}

impl TenantMount {
    /// Creates a mount with its own in-memory task store
    pub fn new(
        tenant_id: impl Into<String>,
        public_base_url: &str,
        executor: Arc<dyn AgentExecutor>,
        default_timeout: Duration,
    ) -> Self {
        let tenant_id = tenant_id.into();
        let base_path = format!("/{}", tenant_id);
        let card = build_card(&tenant_id, public_base_url);
        TenantMount {
            tenant_id,
            base_path,
            card,
            store: Arc::new(InMemoryTaskStore::new()),
            executor,
            default_timeout,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Tenant identifier
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Path prefix the tenant is addressable at
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Published capability card
    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    /// This tenant's task store
    pub fn store(&self) -> Arc<dyn TaskStore> {
        self.store.clone()
    }

    /// This tenant's agent executor
    pub fn executor(&self) -> Arc<dyn AgentExecutor> {
        self.executor.clone()
    }

    /// Default execution deadline
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Registers a live execution for cancel lookup
    pub async fn register_active(&self, task_id: Uuid, execution: ActiveExecution) {
        self.active.lock().await.insert(task_id, execution);
    }

    /// Removes a finished execution
    pub async fn finish_active(&self, task_id: Uuid) {
        self.active.lock().await.remove(&task_id);
    }

    /// Looks up the live execution for a task, if one is running
    pub async fn active_execution(&self, task_id: Uuid) -> Option<ActiveExecution> {
        self.active.lock().await.get(&task_id).cloned()
    }
}

/// Builds the static capability card published for a tenant
fn build_card(tenant_id: &str, public_base_url: &str) -> AgentCard {
    let skill = AgentSkill {
        id: "echo".to_string(),
        name: "Echo".to_string(),
        description: "Streams a canned status update and echoes the input back as an artifact"
            .to_string(),
        tags: vec!["echo".to_string()],
        examples: vec!["hi".to_string(), "hello world".to_string()],
    };

    AgentCard {
        name: tenant_id.to_string(),
        display_name: tenant_id.to_string(),
        description: format!("Agent gateway tenant {}", tenant_id),
        url: format!("{}/{}/", public_base_url, tenant_id),
        version: "1.0.0".to_string(),
        default_input_modes: vec!["text".to_string()],
        default_output_modes: vec!["text".to_string()],
        capabilities: AgentCapabilities { streaming: true },
        skills: vec![skill],
    }
}

/// The gateway router's mounting table
#[derive(Default)]
pub struct TenantRegistry {
    mounts: HashMap<String, Arc<TenantMount>>,
}

impl TenantRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        TenantRegistry {
            mounts: HashMap::new(),
        }
    }

    /// Builds the registry from the configured tenant list
    ///
    /// Every configured tenant gets the echo executor; real capabilities
    /// are registered through `insert` with their own executor.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = TenantRegistry::new();
        let default_timeout = Duration::from_secs(config.gateway.default_timeout_s);

        for tenant_id in &config.gateway.tenants {
            tracing::info!(tenant_id = %tenant_id, "Mounting tenant");
            registry.insert(Arc::new(TenantMount::new(
                tenant_id.clone(),
                &config.gateway.public_base_url,
                Arc::new(EchoExecutor::new()),
                default_timeout,
            )));
        }

        if registry.is_empty() {
            tracing::warn!("No tenants configured; gateway serves only /health");
        }
        registry
    }

    /// Adds a mount to the table
    pub fn insert(&mut self, mount: Arc<TenantMount>) {
        self.mounts.insert(mount.tenant_id().to_string(), mount);
    }

    /// Resolves a tenant identifier to its mount
    pub fn resolve(&self, tenant_id: &str) -> Result<Arc<TenantMount>, ApiError> {
        self.mounts.get(tenant_id).cloned().ok_or_else(|| {
            ApiError::NotFound(format!("No agent mounted for tenant '{}'", tenant_id))
        })
    }

    /// Number of mounted tenants
    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    /// True when nothing is mounted
    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}

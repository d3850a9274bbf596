/// Task store
///
/// Persists task records keyed by task id. The store contract is small on
/// purpose: the gateway core only needs create, lookup and idempotent
/// upsert with read-after-write consistency for a single task id. Write
/// ordering for one task is provided by the task updater, which is the
/// single writer for an execution; the store itself does not reorder.
///
/// The in-memory implementation is the default backing store. A durable
/// backend (or one with an eviction policy such as a TTL) is a valid
/// substitution behind the same trait.
///
/// # Example
///
/// ```
/// use agentgate_core::store::{InMemoryTaskStore, TaskStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), agentgate_core::store::StoreError> {
/// let store = InMemoryTaskStore::new();
/// let task = store.create(Uuid::new_v4()).await?;
/// let loaded = store.get(task.id).await?;
/// assert_eq!(loaded.id, task.id);
/// # Ok(())
/// # }
/// ```

use crate::models::task::Task;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Task store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No task with the given id
    #[error("task {0} not found")]
    NotFound(Uuid),

    /// The backing store cannot be read or written
    #[error("task store unavailable: {0}")]
    Unavailable(String),
}

/// Storage contract for task records
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Creates a new task bound to the given context
    async fn create(&self, context_id: Uuid) -> Result<Task, StoreError>;

    /// Looks up a task by id
    async fn get(&self, task_id: Uuid) -> Result<Task, StoreError>;

    /// Upserts a task, keyed by its id
    async fn save(&self, task: Task) -> Result<(), StoreError>;
}

/// In-memory task store
///
/// A mapping keyed by task id behind an async RwLock. Each tenant mount
/// owns its store exclusively; tasks are never shared across tenants.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store
    pub fn new() -> Self {
        InMemoryTaskStore {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// True when no tasks are stored
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, context_id: Uuid) -> Result<Task, StoreError> {
        let task = Task::new(context_id);
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, task_id: Uuid) -> Result<Task, StoreError> {
        let tasks = self.tasks.read().await;
        tasks.get(&task_id).cloned().ok_or(StoreError::NotFound(task_id))
    }

    async fn save(&self, task: Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task);
        Ok(())
    }
}

/// Core AgentExecutor trait and request context
///
/// Executors are the extension point of the gateway: one implementation
/// per mounted tenant, resolved once at startup. The gateway hands each
/// invocation a read-only request context and the task updater bound to
/// the execution; everything the executor needs travels in those two
/// arguments — there is no ambient or thread-local request state.
///
/// # Example
///
/// ```no_run
/// use agentgate_core::executor::{AgentExecutor, ExecutorResult, RequestContext};
/// use agentgate_core::updater::TaskUpdater;
/// use async_trait::async_trait;
///
/// struct MyExecutor;
///
/// #[async_trait]
/// impl AgentExecutor for MyExecutor {
///     fn name(&self) -> &str {
///         "my_executor"
///     }
///
///     async fn execute(
///         &self,
///         context: &RequestContext,
///         updater: &TaskUpdater,
///     ) -> ExecutorResult<()> {
///         updater.submit().await?;
///         // Do work, emitting status and artifacts...
///         updater.complete().await?;
///         Ok(())
///     }
///
///     async fn cancel(
///         &self,
///         _context: &RequestContext,
///         updater: &TaskUpdater,
///     ) -> ExecutorResult<()> {
///         updater.cancel().await?;
///         Ok(())
///     }
/// }
/// ```

use crate::models::content::Message;
use crate::updater::{TaskUpdater, UpdaterError};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Executor error types
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Agent capability failed internally
    #[error("agent execution failed: {0}")]
    ExecutionFailed(String),

    /// The capability does not support the requested operation
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A task updater call was rejected
    #[error(transparent)]
    Updater(#[from] UpdaterError),
}

/// Executor result type alias
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Read-only per-invocation context
///
/// Carries the caller's input and all per-call ambient data (tenant id,
/// API key header) explicitly, plus the cancellation token the gateway
/// uses for cancel requests and deadline enforcement.
#[derive(Clone)]
pub struct RequestContext {
    task_id: Uuid,
    context_id: Uuid,
    tenant_id: String,
    message: Message,
    api_key: Option<String>,
    cancel_token: CancellationToken,
}

impl RequestContext {
    /// Creates a new request context
    pub fn new(
        task_id: Uuid,
        context_id: Uuid,
        tenant_id: String,
        message: Message,
        api_key: Option<String>,
        cancel_token: CancellationToken,
    ) -> Self {
        RequestContext {
            task_id,
            context_id,
            tenant_id,
            message,
            api_key,
            cancel_token,
        }
    }

    /// Task being executed
    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    /// Context the task belongs to
    pub fn context_id(&self) -> Uuid {
        self.context_id
    }

    /// Tenant the request was routed to
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// The caller's message
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Joined text content of the caller's message
    pub fn user_input(&self) -> String {
        self.message.text()
    }

    /// API key header value, if the caller sent one
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Checks if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Waits for cancellation
    pub async fn cancelled(&self) {
        self.cancel_token.cancelled().await
    }

    /// Requests cancellation of this execution
    pub fn cancel(&self) {
        self.cancel_token.cancel()
    }
}

/// Polymorphic interface over an agent capability
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Returns the executor name, used for logging
    fn name(&self) -> &str;

    /// Runs one task execution
    ///
    /// The executor should:
    /// 1. Call `updater.submit()` first
    /// 2. Emit status and artifact updates as work progresses
    /// 3. Check `context.is_cancelled()` at suspension points
    /// 4. Finish with exactly one of `complete`/`fail`/`cancel`
    ///
    /// The request handler converts any returned error into a sanitized
    /// terminal `failed` event if the task is not yet terminal.
    async fn execute(&self, context: &RequestContext, updater: &TaskUpdater)
        -> ExecutorResult<()>;

    /// Cancels a non-terminal task
    ///
    /// Implementations that cannot stop mid-flight work must return
    /// `ExecutorError::Unsupported`; the gateway then forces the terminal
    /// `canceled` transition itself so the task is never left dangling.
    async fn cancel(&self, context: &RequestContext, updater: &TaskUpdater)
        -> ExecutorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::Part;

    fn sample_context(token: CancellationToken) -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "demo".to_string(),
            Message::user(vec![Part::text("hello"), Part::text("world")]),
            Some("secret-key".to_string()),
            token,
        )
    }

    #[test]
    fn test_context_exposes_explicit_ambient_data() {
        let context = sample_context(CancellationToken::new());
        assert_eq!(context.tenant_id(), "demo");
        assert_eq!(context.api_key(), Some("secret-key"));
        assert_eq!(context.user_input(), "hello\nworld");
    }

    #[test]
    fn test_context_cancellation() {
        let token = CancellationToken::new();
        let context = sample_context(token.clone());

        assert!(!context.is_cancelled());
        token.cancel();
        assert!(context.is_cancelled());
    }
}

/// Agent executor system
///
/// This module defines the executor trait — the polymorphic interface the
/// gateway uses to drive an agent capability — and the echo sample
/// implementation. Each mounted tenant plugs one executor into the
/// gateway; real capabilities implement the same trait.
///
/// # Executor contract
///
/// Every `execute` invocation must eventually drive its task updater into
/// exactly one terminal state, even on internal failure; the request
/// handler additionally guards against executors that neglect to
/// finalize. `cancel` is only invoked for non-terminal tasks; an executor
/// that cannot cancel mid-flight reports a typed unsupported-operation
/// error and the gateway forces the terminal state itself.

pub mod echo;
pub mod executor_trait;

// Re-export main types
pub use echo::EchoExecutor;
pub use executor_trait::{
    AgentExecutor, ExecutorError, ExecutorResult, RequestContext,
};

/// Task model and lifecycle state machine
///
/// This module provides the Task record representing one unit of requested
/// work for a tenant, together with the state machine that governs its
/// lifecycle. Tasks are the core entity of the agentgate system.
///
/// # State Machine
///
/// ```text
/// submitted → working ⇄ input-required
///           working → completed
///                   → failed
///                   → canceled
/// ```
///
/// `input-required` is a parked, non-terminal state: a task may sit there
/// indefinitely until the caller resumes it or cancels it. Terminal states
/// never transition again.
///
/// # Example
///
/// ```
/// use agentgate_core::models::task::{Task, TaskState, TaskStatus};
/// use uuid::Uuid;
///
/// let mut task = Task::new(Uuid::new_v4());
/// assert_eq!(task.status.state, TaskState::Submitted);
///
/// task.apply_status(TaskStatus::new(TaskState::Working, None));
/// assert!(!task.status.state.is_terminal());
/// ```

use crate::models::content::{Artifact, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Task execution state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been accepted and recorded
    Submitted,

    /// Task is actively being worked on by the agent
    Working,

    /// Agent is parked waiting for further caller input
    InputRequired,

    /// Task finished successfully
    Completed,

    /// Task finished with an error
    Failed,

    /// Task was canceled by the caller or the gateway
    Canceled,
}

impl TaskState {
    /// Converts state to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
        }
    }

    /// Checks if state is terminal (no further transition possible)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled
        )
    }

    /// Checks if transition to target state is valid
    pub fn can_transition_to(&self, target: TaskState) -> bool {
        match (self, target) {
            // Terminal states cannot transition
            (state, _) if state.is_terminal() => false,

            // Submitted is only ever entered once, at creation
            (_, TaskState::Submitted) => false,

            // Working and input-required may alternate any number of
            // times; any non-terminal state may reach a terminal one
            _ => true,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point-in-time status of a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// Optional agent message attached to the transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// When the status was reached
    pub timestamp: DateTime<Utc>,
}

impl TaskStatus {
    /// Creates a status stamped with the current time
    pub fn new(state: TaskState, message: Option<Message>) -> Self {
        TaskStatus {
            state,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Task record representing one unit of requested work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID, generated at creation, immutable
    pub id: Uuid,

    /// Logical session this task belongs to, immutable once assigned
    #[serde(rename = "contextId")]
    pub context_id: Uuid,

    /// Current status
    pub status: TaskStatus,

    /// Ordered, append-only sequence of every status reached
    pub history: Vec<TaskStatus>,

    /// Ordered sequence of output artifacts produced during execution
    pub artifacts: Vec<Artifact>,

    /// When the task was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in submitted state with an empty history
    ///
    /// The submitted status is appended to the history by the task
    /// updater's `submit()` call, which also emits the matching event.
    pub fn new(context_id: Uuid) -> Self {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            context_id,
            status: TaskStatus {
                state: TaskState::Submitted,
                message: None,
                timestamp: now,
            },
            history: Vec::new(),
            artifacts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a new status, appending it to the history
    pub fn apply_status(&mut self, status: TaskStatus) {
        self.history.push(status.clone());
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Appends an artifact without changing status
    pub fn add_artifact(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::Part;

    #[test]
    fn test_task_state_as_str() {
        assert_eq!(TaskState::Submitted.as_str(), "submitted");
        assert_eq!(TaskState::Working.as_str(), "working");
        assert_eq!(TaskState::InputRequired.as_str(), "input-required");
        assert_eq!(TaskState::Completed.as_str(), "completed");
        assert_eq!(TaskState::Failed.as_str(), "failed");
        assert_eq!(TaskState::Canceled.as_str(), "canceled");
    }

    #[test]
    fn test_task_state_wire_form() {
        let json = serde_json::to_string(&TaskState::InputRequired).unwrap();
        assert_eq!(json, "\"input-required\"");

        let state: TaskState = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(state, TaskState::Canceled);
    }

    #[test]
    fn test_task_state_is_terminal() {
        assert!(!TaskState::Submitted.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
    }

    #[test]
    fn test_task_state_transitions() {
        // Submitted transitions
        assert!(TaskState::Submitted.can_transition_to(TaskState::Working));
        assert!(TaskState::Submitted.can_transition_to(TaskState::Completed));
        assert!(TaskState::Submitted.can_transition_to(TaskState::Canceled));

        // Working and input-required may alternate
        assert!(TaskState::Working.can_transition_to(TaskState::InputRequired));
        assert!(TaskState::InputRequired.can_transition_to(TaskState::Working));
        assert!(TaskState::Working.can_transition_to(TaskState::Working));

        // Parked tasks can still be canceled
        assert!(TaskState::InputRequired.can_transition_to(TaskState::Canceled));

        // Submitted is never re-entered
        assert!(!TaskState::Working.can_transition_to(TaskState::Submitted));

        // Terminal states cannot transition
        assert!(!TaskState::Completed.can_transition_to(TaskState::Working));
        assert!(!TaskState::Failed.can_transition_to(TaskState::Canceled));
        assert!(!TaskState::Canceled.can_transition_to(TaskState::Completed));
    }

    #[test]
    fn test_task_history_is_append_only() {
        let mut task = Task::new(Uuid::new_v4());
        assert!(task.history.is_empty());

        task.apply_status(TaskStatus::new(TaskState::Submitted, None));
        task.apply_status(TaskStatus::new(
            TaskState::Working,
            Some(Message::agent_text("thinking")),
        ));
        task.apply_status(TaskStatus::new(TaskState::Completed, None));

        assert_eq!(task.history.len(), 3);
        assert_eq!(task.history[0].state, TaskState::Submitted);
        assert_eq!(task.history[1].state, TaskState::Working);
        assert_eq!(task.history[2].state, TaskState::Completed);
        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[test]
    fn test_task_artifacts_keep_order() {
        let mut task = Task::new(Uuid::new_v4());
        task.add_artifact(Artifact::new(Some("first".to_string()), vec![Part::text("a")]));
        task.add_artifact(Artifact::new(Some("second".to_string()), vec![Part::text("b")]));

        assert_eq!(task.artifacts.len(), 2);
        assert_eq!(task.artifacts[0].name.as_deref(), Some("first"));
        assert_eq!(task.artifacts[1].name.as_deref(), Some("second"));
    }
}

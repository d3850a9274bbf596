/// Per-task event queue
///
/// Each task execution gets one queue: the task updater is the single
/// producer, the request handler's transport loop is the single consumer.
/// Events are delivered in enqueue order with no loss or coalescing, and
/// the consumer terminates exactly when the one `final=true` event has
/// been delivered.
///
/// The queue is an unbounded channel, so `enqueue` never blocks; the
/// consumer suspends cooperatively while waiting for the next event.
/// Delivery is best-effort: if the consumer is gone (the transport
/// disconnected mid-stream), events are dropped and the execution keeps
/// running — the store write that precedes each emission is the durable
/// record.
///
/// # Example
///
/// ```
/// use agentgate_core::events::{EventQueue, TaskEvent};
/// use agentgate_core::models::task::{TaskState, TaskStatus};
/// use uuid::Uuid;
///
/// # async fn example() {
/// let (queue, mut consumer) = EventQueue::new();
/// let task_id = Uuid::new_v4();
/// let context_id = Uuid::new_v4();
///
/// let status = TaskStatus::new(TaskState::Completed, None);
/// queue.enqueue(TaskEvent::status_update(task_id, context_id, status, true));
///
/// while let Some(event) = consumer.next_event().await {
///     println!("{:?}", event.state());
/// }
/// # }
/// ```

use crate::models::content::Artifact;
use crate::models::task::{TaskState, TaskStatus};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Event body: a status transition or an artifact emission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskEventBody {
    /// Task moved to a new status
    StatusUpdate { status: TaskStatus },

    /// Task produced an artifact; status is unchanged
    ArtifactUpdate { artifact: Artifact },
}

/// Immutable record appended to a task's event queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    /// Owning task
    #[serde(rename = "taskId")]
    pub task_id: Uuid,

    /// Owning context
    #[serde(rename = "contextId")]
    pub context_id: Uuid,

    /// True only on the last event of an execution
    #[serde(rename = "final")]
    pub is_final: bool,

    /// Status or artifact payload
    #[serde(flatten)]
    pub body: TaskEventBody,
}

impl TaskEvent {
    /// Creates a status-update event
    pub fn status_update(
        task_id: Uuid,
        context_id: Uuid,
        status: TaskStatus,
        is_final: bool,
    ) -> Self {
        TaskEvent {
            task_id,
            context_id,
            is_final,
            body: TaskEventBody::StatusUpdate { status },
        }
    }

    /// Creates an artifact-update event
    pub fn artifact_update(task_id: Uuid, context_id: Uuid, artifact: Artifact) -> Self {
        TaskEvent {
            task_id,
            context_id,
            is_final: false,
            body: TaskEventBody::ArtifactUpdate { artifact },
        }
    }

    /// The state carried by a status-update event, if any
    pub fn state(&self) -> Option<TaskState> {
        match &self.body {
            TaskEventBody::StatusUpdate { status } => Some(status.state),
            TaskEventBody::ArtifactUpdate { .. } => None,
        }
    }

    /// The artifact carried by an artifact-update event, if any
    pub fn artifact(&self) -> Option<&Artifact> {
        match &self.body {
            TaskEventBody::ArtifactUpdate { artifact } => Some(artifact),
            TaskEventBody::StatusUpdate { .. } => None,
        }
    }
}

/// Producer handle for one task execution's events
///
/// Cheap to clone; all clones feed the same consumer in enqueue order.
#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<TaskEvent>,
}

impl EventQueue {
    /// Creates a queue together with its single consumer
    pub fn new() -> (EventQueue, EventConsumer) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            EventQueue { tx },
            EventConsumer {
                rx,
                finished: false,
            },
        )
    }

    /// Appends an event
    ///
    /// Best-effort: when the consumer has been dropped the event is
    /// discarded, so a departed transport never stops the producing
    /// execution.
    pub fn enqueue(&self, event: TaskEvent) {
        let task_id = event.task_id;
        if self.tx.send(event).is_err() {
            tracing::debug!(task_id = %task_id, "Event consumer gone; dropping event");
        }
    }
}

/// Single-pass consumer of a task execution's events
///
/// Yields events in enqueue order and terminates after delivering the
/// `final=true` event. Not restartable: a finished consumer stays
/// finished even if a producer (in violation of the updater contract)
/// were to enqueue more events.
pub struct EventConsumer {
    rx: mpsc::UnboundedReceiver<TaskEvent>,
    finished: bool,
}

impl EventConsumer {
    /// Waits for the next event
    ///
    /// Returns `None` once the final event has been delivered or all
    /// producers are gone.
    pub async fn next_event(&mut self) -> Option<TaskEvent> {
        if self.finished {
            return None;
        }
        let event = self.rx.recv().await?;
        if event.is_final {
            self.finished = true;
        }
        Some(event)
    }

    /// Drains the queue to completion, collecting every event
    pub async fn collect_events(mut self) -> Vec<TaskEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }
}

impl Stream for EventConsumer {
    type Item = TaskEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<TaskEvent>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(event)) => {
                if event.is_final {
                    self.finished = true;
                }
                Poll::Ready(Some(event))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{Message, Part};

    fn status_event(task_id: Uuid, context_id: Uuid, state: TaskState, is_final: bool) -> TaskEvent {
        TaskEvent::status_update(task_id, context_id, TaskStatus::new(state, None), is_final)
    }

    #[tokio::test]
    async fn test_events_arrive_in_enqueue_order() {
        let (queue, mut consumer) = EventQueue::new();
        let task_id = Uuid::new_v4();
        let context_id = Uuid::new_v4();

        queue.enqueue(status_event(task_id, context_id, TaskState::Submitted, false));
        queue.enqueue(status_event(task_id, context_id, TaskState::Working, false));
        queue.enqueue(TaskEvent::artifact_update(
            task_id,
            context_id,
            Artifact::new(Some("out".to_string()), vec![Part::text("x")]),
        ));
        queue.enqueue(status_event(task_id, context_id, TaskState::Completed, true));

        let events = consumer.collect_events().await;
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].state(), Some(TaskState::Submitted));
        assert_eq!(events[1].state(), Some(TaskState::Working));
        assert!(events[2].artifact().is_some());
        assert_eq!(events[3].state(), Some(TaskState::Completed));
        assert!(events[3].is_final);
    }

    #[tokio::test]
    async fn test_consumer_terminates_at_final_event() {
        let (queue, mut consumer) = EventQueue::new();
        let task_id = Uuid::new_v4();
        let context_id = Uuid::new_v4();

        queue.enqueue(status_event(task_id, context_id, TaskState::Completed, true));
        // A contract-violating event after the final one must not be seen
        queue.enqueue(status_event(task_id, context_id, TaskState::Working, false));

        assert!(consumer.next_event().await.unwrap().is_final);
        assert!(consumer.next_event().await.is_none());
        assert!(consumer.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_enqueue_after_consumer_dropped_is_a_noop() {
        let (queue, consumer) = EventQueue::new();
        drop(consumer);

        // The producer side must not observe the departed consumer
        queue.enqueue(status_event(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TaskState::Working,
            false,
        ));
        queue.enqueue(status_event(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TaskState::Completed,
            true,
        ));
    }

    #[test]
    fn test_event_wire_form() {
        let task_id = Uuid::new_v4();
        let context_id = Uuid::new_v4();
        let event = TaskEvent::status_update(
            task_id,
            context_id,
            TaskStatus::new(TaskState::Working, Some(Message::agent_text("hi"))),
            false,
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"status-update\""));
        assert!(json.contains("\"final\":false"));
        assert!(json.contains("\"taskId\""));
        assert!(json.contains("\"working\""));
    }
}

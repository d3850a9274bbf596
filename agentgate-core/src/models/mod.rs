/// Data model for the gateway
///
/// - `task`: task record and lifecycle state machine
/// - `content`: messages, parts and artifacts
/// - `card`: static agent capability card

pub mod card;
pub mod content;
pub mod task;

pub use card::{AgentCapabilities, AgentCard, AgentSkill};
pub use content::{Artifact, Message, Part, Role};
pub use task::{Task, TaskState, TaskStatus};

/// Message, part and artifact content model
///
/// Messages carry the caller's input and the agent's commentary; artifacts
/// carry named outputs produced during execution. Both are built from parts:
/// plain text, or a file attachment with optional inline base64 bytes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// One piece of message or artifact content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    /// Plain text
    Text { text: String },

    /// File attachment with optional inline content
    File {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,

        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,

        /// Base64-encoded file content
        #[serde(skip_serializing_if = "Option::is_none")]
        bytes: Option<String>,
    },
}

impl Part {
    /// Creates a text part
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }
}

/// A message exchanged between caller and agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message author
    pub role: Role,

    /// Ordered content parts
    pub parts: Vec<Part>,
}

impl Message {
    /// Creates a user message from parts
    pub fn user(parts: Vec<Part>) -> Self {
        Message {
            role: Role::User,
            parts,
        }
    }

    /// Creates an agent message with a single text part
    pub fn agent_text(text: impl Into<String>) -> Self {
        Message {
            role: Role::Agent,
            parts: vec![Part::text(text)],
        }
    }

    /// Joins all text parts into one string
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True when the message carries no usable content
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
            || self.parts.iter().all(|part| match part {
                Part::Text { text } => text.trim().is_empty(),
                Part::File { bytes, .. } => bytes.is_none(),
            })
    }
}

/// A named output produced during task execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique artifact ID
    #[serde(rename = "artifactId")]
    pub artifact_id: Uuid,

    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ordered content parts
    pub parts: Vec<Part>,
}

impl Artifact {
    /// Creates a new artifact with a generated ID
    pub fn new(name: Option<String>, parts: Vec<Part>) -> Self {
        Artifact {
            artifact_id: Uuid::new_v4(),
            name,
            parts,
        }
    }
}

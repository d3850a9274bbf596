/// Agent capability card
///
/// The card is a static, self-describing manifest for one mounted tenant:
/// what the agent can do, which input and output modes it accepts, and
/// whether it streams. It is built once at mount time and served read-only
/// at the tenant's well-known path; it never changes afterwards.

use serde::{Deserialize, Serialize};

/// Optional capabilities advertised by an agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// Whether the agent supports SSE streaming of task events
    pub streaming: bool,
}

/// A distinct skill the agent can perform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSkill {
    /// Unique skill identifier
    pub id: String,

    /// Human-readable skill name
    pub name: String,

    /// What the skill does
    pub description: String,

    /// Keywords describing the skill
    pub tags: Vec<String>,

    /// Example prompts this skill handles
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<String>,
}

/// Static descriptor of one tenant's advertised capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    /// Tenant identifier this card describes
    pub name: String,

    /// Human-readable display name
    #[serde(rename = "displayName")]
    pub display_name: String,

    /// What this agent does
    pub description: String,

    /// Base URL the tenant is mounted at
    pub url: String,

    /// Card schema version
    pub version: String,

    /// Input modes accepted by default
    #[serde(rename = "defaultInputModes")]
    pub default_input_modes: Vec<String>,

    /// Output modes produced by default
    #[serde(rename = "defaultOutputModes")]
    pub default_output_modes: Vec<String>,

    /// Optional capabilities
    pub capabilities: AgentCapabilities,

    /// Skills the agent advertises
    pub skills: Vec<AgentSkill>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> AgentCard {
        AgentCard {
            name: "demo".to_string(),
            display_name: "Demo".to_string(),
            description: "Echo agent".to_string(),
            url: "http://localhost:9999/demo/".to_string(),
            version: "1.0.0".to_string(),
            default_input_modes: vec!["text".to_string()],
            default_output_modes: vec!["text".to_string()],
            capabilities: AgentCapabilities { streaming: true },
            skills: vec![AgentSkill {
                id: "echo".to_string(),
                name: "Echo".to_string(),
                description: "Echoes the input back".to_string(),
                tags: vec!["echo".to_string()],
                examples: vec!["hi".to_string()],
            }],
        }
    }

    #[test]
    fn test_card_wire_form_uses_camel_case() {
        let json = serde_json::to_string(&sample_card()).unwrap();
        assert!(json.contains("\"defaultInputModes\""));
        assert!(json.contains("\"defaultOutputModes\""));
        assert!(json.contains("\"displayName\""));
        assert!(json.contains("\"streaming\":true"));
    }

    #[test]
    fn test_card_round_trips() {
        let card = sample_card();
        let json = serde_json::to_string(&card).unwrap();
        let parsed: AgentCard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "demo");
        assert_eq!(parsed.skills.len(), 1);
        assert_eq!(parsed.skills[0].id, "echo");
    }
}

//! Wire models shared by the advisor server, the tool server, and the
//! meta-agent clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

//
// ================= Agent Card (A2A) =================
//

/// Public profile of the advisor agent, served at /.well-known/agent.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub skills: Vec<AgentSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSkill {
    pub name: String,
    pub description: String,
    pub examples: Vec<String>,
}

//
// ================= A2A Task =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub message: TaskMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMessage {
    #[serde(default)]
    pub role: Option<String>,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactPart {
    #[serde(rename = "type")]
    pub part_type: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub parts: Vec<ArtifactPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub status: TaskStatus,
    pub artifacts: Vec<Artifact>,
}

impl Task {
    fn with_text(id: String, state: TaskState, text: String) -> Self {
        Self {
            id,
            status: TaskStatus {
                state,
                timestamp: Utc::now(),
            },
            artifacts: vec![Artifact {
                parts: vec![ArtifactPart {
                    part_type: "text".to_string(),
                    text,
                }],
            }],
        }
    }

    pub fn completed(id: String, text: String) -> Self {
        Self::with_text(id, TaskState::Completed, text)
    }

    pub fn failed(id: String, message: String) -> Self {
        Self::with_text(id, TaskState::Failed, message)
    }

    /// Text of the first artifact part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.artifacts
            .first()
            .and_then(|a| a.parts.first())
            .map(|p| p.text.as_str())
    }
}

//
// ================= MCP Tool Descriptors =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub result: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_serializes_camel_case_schema() {
        let descriptor = ToolDescriptor {
            name: "equity_analyzer".to_string(),
            description: "Stock metrics".to_string(),
            input_schema: json!({"type": "object"}),
        };

        let value = serde_json::to_value(&descriptor).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
    }

    #[test]
    fn test_call_request_defaults_arguments() {
        let req: ToolCallRequest =
            serde_json::from_str(r#"{"name": "equity_analyzer"}"#).unwrap();
        assert_eq!(req.name, "equity_analyzer");
        assert!(req.arguments.is_null());
    }

    #[test]
    fn test_task_round_trip() {
        let task = Task::completed("t-1".to_string(), "All good".to_string());
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.first_text(), Some("All good"));

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["status"]["state"], "completed");
        assert_eq!(value["artifacts"][0]["parts"][0]["type"], "text");
    }
}

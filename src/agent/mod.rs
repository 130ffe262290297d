//! Meta-agent - zero-shot tool routing
//!
//! QUERY → THINK → ACT (tool call) → OBSERVE → ... → FINAL ANSWER
//!
//! The routing model picks one of the registered tools per step by
//! emitting a JSON action; a hard iteration cap bounds the loop.

use crate::llm::ChatModel;
use crate::tools::Tool;
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_ITERATIONS: u32 = 3;

/// One decision from the routing model
#[derive(Debug, Clone, PartialEq)]
pub enum AgentAction {
    Invoke { action: String, action_input: String },
    Finish(String),
}

/// Final answer plus the reasoning trace that produced it
#[derive(Debug, Clone)]
pub struct AgentRunResult {
    pub output: String,
    pub trace: Vec<String>,
}

pub struct MetaAgent {
    chat: Arc<dyn ChatModel>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: u32,
}

impl MetaAgent {
    pub fn new(chat: Arc<dyn ChatModel>, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            chat,
            tools,
            max_iterations: MAX_ITERATIONS,
        }
    }

    fn find_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    fn build_system_prompt(&self) -> String {
        let tool_lines: Vec<String> = self
            .tools
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect();

        format!(
            r#"You are a financial query router. Answer the user's question,
using the available tools when they help.

Available tools:
{}

Respond with EXACTLY ONE JSON object, nothing else:
- To use a tool:    {{"action": "<tool name>", "action_input": "<input string>"}}
- To answer:        {{"final_answer": "<your answer>"}}

Rules:
- One tool call per response
- Base the final answer on the observations gathered
- Return ONLY valid JSON"#,
            tool_lines.join("\n")
        )
    }

    fn build_user_prompt(query: &str, scratchpad: &str) -> String {
        if scratchpad.is_empty() {
            format!("Question: {}", query)
        } else {
            format!(
                "Question: {}\n\nSteps so far:\n{}\nDecide the next action or give the final answer.",
                query, scratchpad
            )
        }
    }

    /// Route a query through the tools until the model answers or the
    /// iteration cap is hit.
    pub async fn run(&self, query: &str) -> Result<AgentRunResult> {
        let system_prompt = self.build_system_prompt();
        let mut scratchpad = String::new();
        let mut trace = Vec::new();
        let mut last_observation: Option<String> = None;

        info!(query = %query, "Meta-agent: routing query");
        trace.push("INPUT: Query received".to_string());

        for iteration in 1..=self.max_iterations {
            let prompt = Self::build_user_prompt(query, &scratchpad);
            let response = self.chat.complete(&system_prompt, &prompt).await?;

            let Some(action) = parse_action(&response) else {
                // Parse tolerance: hand the raw model output back as the answer
                warn!(iteration, "Unparseable routing response, using it verbatim");
                trace.push("THINK: Unparseable action, returning raw response".to_string());
                return Ok(AgentRunResult {
                    output: response,
                    trace,
                });
            };

            match action {
                AgentAction::Finish(answer) => {
                    trace.push(format!("COMPLETE: Final answer after {} step(s)", iteration));
                    return Ok(AgentRunResult {
                        output: answer,
                        trace,
                    });
                }
                AgentAction::Invoke {
                    action,
                    action_input,
                } => {
                    debug!(iteration, tool = %action, "Meta-agent: invoking tool");
                    trace.push(format!("ACT: {} ({})", action, action_input));

                    let observation = match self.find_tool(&action) {
                        Some(tool) => match tool.execute(&action_input).await {
                            Ok(value) => value_to_observation(&value),
                            Err(e) => e.to_string(),
                        },
                        None => format!("Unknown tool: {}", action),
                    };

                    trace.push(format!(
                        "OBSERVE: {} chars from {}",
                        observation.len(),
                        action
                    ));

                    scratchpad.push_str(&format!(
                        "Action: {}\nAction input: {}\nObservation: {}\n\n",
                        action, action_input, observation
                    ));
                    last_observation = Some(observation);
                }
            }
        }

        warn!(
            max_iterations = self.max_iterations,
            "Meta-agent: iteration limit reached"
        );
        trace.push("STOP: Iteration limit reached".to_string());

        let output = match last_observation {
            Some(obs) => format!(
                "Agent stopped due to iteration limit. Last observation: {}",
                obs
            ),
            None => "Agent stopped due to iteration limit.".to_string(),
        };

        Ok(AgentRunResult { output, trace })
    }
}

/// Parse the routing model's JSON action, tolerating ```json fences.
pub fn parse_action(response: &str) -> Option<AgentAction> {
    let cleaned = response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let json: Value = serde_json::from_str(cleaned).ok()?;
    let obj = json.as_object()?;

    if let Some(answer) = obj.get("final_answer") {
        let answer = answer
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| answer.to_string());
        return Some(AgentAction::Finish(answer));
    }

    let action = obj.get("action")?.as_str()?.to_string();
    let action_input = match obj.get("action_input") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    Some(AgentAction::Invoke {
        action,
        action_input,
    })
}

fn value_to_observation(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

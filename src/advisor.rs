//! A2A advisor server
//!
//! Exposes one chat-style financial agent: an agent card at the
//! well-known path and a task endpoint backed by a chat-completion call.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm::ChatModel;
use crate::models::{AgentCard, AgentSkill, Task, TaskRequest};

const SYSTEM_PROMPT: &str = "You are an advanced financial intelligence advisor \
specializing in equity research and portfolio strategy. Provide data-driven \
insights with clear reasoning.";

/// Agent profile served to A2A clients.
pub fn agent_card(base_url: &str) -> AgentCard {
    AgentCard {
        name: "Financial Intelligence Advisor".to_string(),
        description: "Advanced AI specialist in equity research, portfolio \
                      optimization, and market intelligence."
            .to_string(),
        url: base_url.to_string(),
        version: "1.2.0".to_string(),
        skills: vec![
            AgentSkill {
                name: "Market Intelligence".to_string(),
                description: "Deep analysis of market conditions, sector rotations, \
                              and economic indicators."
                    .to_string(),
                examples: vec![
                    "How is the current economic cycle affecting tech valuations?".to_string(),
                    "Should I be concerned about rising bond yields?".to_string(),
                ],
            },
            AgentSkill {
                name: "Portfolio Optimization".to_string(),
                description: "Strategic asset allocation and risk-adjusted return \
                              maximization techniques."
                    .to_string(),
                examples: vec![
                    "What's the optimal allocation between growth and value stocks right now?"
                        .to_string(),
                    "How do I hedge against inflation in my portfolio?".to_string(),
                ],
            },
            AgentSkill {
                name: "Equity Research".to_string(),
                description: "Comprehensive company evaluation using financial metrics \
                              and competitive analysis."
                    .to_string(),
                examples: vec![
                    "What makes a company undervalued in today's market?".to_string(),
                    "How do I evaluate a company's competitive moat?".to_string(),
                ],
            },
        ],
    }
}

/// =============================
/// Server State
/// =============================

#[derive(Clone)]
pub struct AdvisorState {
    pub card: Arc<AgentCard>,
    pub chat: Arc<dyn ChatModel>,
}

/// =============================
/// Handlers
/// =============================

async fn get_card(State(state): State<AdvisorState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

async fn send_task(
    State(state): State<AdvisorState>,
    Json(req): Json<TaskRequest>,
) -> Json<Task> {
    let task_id = req.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let query = req.message.content.text;

    info!(task_id = %task_id, "Advisor task received");

    // Blanket policy: any failure becomes a failed task with the message text
    let task = match state.chat.complete(SYSTEM_PROMPT, &query).await {
        Ok(answer) => Task::completed(task_id, answer),
        Err(e) => {
            warn!(error = %e, "Advisor completion failed");
            Task::failed(task_id, e.to_string())
        }
    };

    Json(task)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "agent": "Financial Intelligence Advisor"
    }))
}

/// =============================
/// Router
/// =============================

pub fn create_router(card: AgentCard, chat: Arc<dyn ChatModel>) -> Router {
    let state = AdvisorState {
        card: Arc::new(card),
        chat,
    };

    Router::new()
        .route("/.well-known/agent.json", get(get_card))
        .route("/agent.json", get(get_card))
        .route("/tasks/send", post(send_task))
        .route("/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    chat: Arc<dyn ChatModel>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let card = agent_card(&format!("http://localhost:{}", port));
    let router = create_router(card, chat);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("A2A advisor server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedChat;
    use crate::models::{MessageContent, TaskMessage, TaskState};

    fn test_state(responses: Vec<String>) -> AdvisorState {
        AdvisorState {
            card: Arc::new(agent_card("http://localhost:5001")),
            chat: Arc::new(ScriptedChat::new(responses)),
        }
    }

    fn task_request(text: &str) -> TaskRequest {
        TaskRequest {
            id: Some("task-1".to_string()),
            message: TaskMessage {
                role: Some("user".to_string()),
                content: MessageContent {
                    content_type: "text".to_string(),
                    text: text.to_string(),
                },
            },
        }
    }

    #[test]
    fn test_agent_card_profile() {
        let card = agent_card("http://localhost:5001");

        assert_eq!(card.name, "Financial Intelligence Advisor");
        assert_eq!(card.version, "1.2.0");
        assert_eq!(card.skills.len(), 3);
        assert_eq!(card.skills[0].name, "Market Intelligence");
        assert!(card.skills.iter().all(|s| s.examples.len() == 2));
    }

    #[tokio::test]
    async fn test_send_task_completes() {
        let state = test_state(vec!["Diversify across sectors.".to_string()]);

        let Json(task) = send_task(State(state), Json(task_request("How do I hedge?"))).await;

        assert_eq!(task.id, "task-1");
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.first_text(), Some("Diversify across sectors."));
    }

    #[tokio::test]
    async fn test_send_task_failure_becomes_failed_task() {
        // Exhausted script: every completion errors
        let state = test_state(vec![]);

        let Json(task) = send_task(State(state), Json(task_request("anything"))).await;

        assert_eq!(task.status.state, TaskState::Failed);
        assert!(task.first_text().unwrap().contains("exhausted"));
    }
}

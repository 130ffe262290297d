//! MCP-style tool server
//!
//! Exposes the tool registry over a generic HTTP contract:
//! GET /tools, POST /call_tool, GET /health

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::models::{ToolCallRequest, ToolCallResponse, ToolDescriptor};
use crate::tools::ToolRegistry;

/// =============================
/// Server State
/// =============================

#[derive(Clone)]
pub struct McpState {
    pub registry: Arc<ToolRegistry>,
}

/// =============================
/// Handlers
/// =============================

async fn list_tools(State(state): State<McpState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.registry.descriptors())
}

async fn call_tool(
    State(state): State<McpState>,
    Json(req): Json<ToolCallRequest>,
) -> Json<ToolCallResponse> {
    info!(tool = %req.name, "Tool call received");

    let input = req
        .arguments
        .get("input")
        .and_then(Value::as_str)
        .unwrap_or("");

    let result = match state.registry.get(&req.name) {
        Some(tool) => match tool.execute(input).await {
            Ok(value) => value,
            Err(e) => {
                warn!(tool = %req.name, error = %e, "Tool execution failed");
                json!({"error": e.to_string()})
            }
        },
        None => {
            warn!(tool = %req.name, "Unknown tool requested");
            json!({"error": format!("Unknown tool: {}", req.name)})
        }
    };

    Json(ToolCallResponse { result })
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "server": "MCP Finance Tools"
    }))
}

/// =============================
/// Router
/// =============================

pub fn create_router(registry: Arc<ToolRegistry>) -> Router {
    let state = McpState { registry };

    Router::new()
        .route("/tools", get(list_tools))
        .route("/call_tool", post(call_tool))
        .route("/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    registry: Arc<ToolRegistry>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(registry);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("MCP tool server listening on http://0.0.0.0:{}", port);
    info!("Available tools: equity_analyzer, market_intelligence");

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::create_default_registry;

    fn test_state() -> McpState {
        McpState {
            registry: Arc::new(create_default_registry()),
        }
    }

    #[tokio::test]
    async fn test_list_tools_returns_two_descriptors() {
        let Json(descriptors) = list_tools(State(test_state())).await;

        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name, "equity_analyzer");
        assert_eq!(descriptors[1].name, "market_intelligence");
    }

    #[tokio::test]
    async fn test_unknown_tool_yields_error_object() {
        let req = ToolCallRequest {
            name: "portfolio_wizard".to_string(),
            arguments: json!({"input": "TSLA"}),
        };

        let Json(response) = call_tool(State(test_state()), Json(req)).await;
        assert_eq!(response.result["error"], "Unknown tool: portfolio_wizard");
    }

    #[tokio::test]
    async fn test_call_without_arguments_defaults_to_empty_input() {
        let req = ToolCallRequest {
            name: "equity_analyzer".to_string(),
            arguments: Value::Null,
        };

        let Json(response) = call_tool(State(test_state()), Json(req)).await;
        assert_eq!(response.result["error"], "No input provided.");
    }

    #[tokio::test]
    async fn test_health_payload_is_fixed() {
        let Json(payload) = health().await;

        assert_eq!(payload["status"], "healthy");
        assert_eq!(payload["server"], "MCP Finance Tools");
    }
}

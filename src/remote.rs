//! HTTP clients for the advisor and tool servers, plus the meta-agent's
//! local wrappers around them.
//!
//! Wrappers follow the blanket policy: remote failures are converted to
//! strings the routing model can observe, never surfaced as errors.

use crate::error::MeshError;
use crate::models::{
    AgentCard, MessageContent, Task, TaskMessage, TaskRequest, TaskState, ToolCallRequest,
    ToolCallResponse, ToolDescriptor,
};
use crate::tools::Tool;
use crate::Result;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

fn build_client() -> Client {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(60))
        .pool_max_idle_per_host(8)
        .timeout(Duration::from_secs(60))
        .build()
        .expect("Failed to build HTTP client")
}

/// =============================
/// A2A Client
/// =============================

#[derive(Clone)]
pub struct A2aClient {
    client: Client,
    base_url: String,
}

impl A2aClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_card(&self) -> Result<AgentCard> {
        let url = format!("{}/.well-known/agent.json", self.base_url);

        let card = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MeshError::AgentError(format!("Agent card fetch failed: {}", e)))?
            .json::<AgentCard>()
            .await
            .map_err(|e| MeshError::AgentError(format!("Invalid agent card: {}", e)))?;

        Ok(card)
    }

    /// Send one text task and return the answer text.
    pub async fn ask(&self, text: &str) -> Result<String> {
        let url = format!("{}/tasks/send", self.base_url);

        let request = TaskRequest {
            id: Some(uuid::Uuid::new_v4().to_string()),
            message: TaskMessage {
                role: Some("user".to_string()),
                content: MessageContent {
                    content_type: "text".to_string(),
                    text: text.to_string(),
                },
            },
        };

        debug!(url = %url, "Sending A2A task");

        let task = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MeshError::AgentError(format!("A2A request failed: {}", e)))?
            .json::<Task>()
            .await
            .map_err(|e| MeshError::AgentError(format!("Invalid A2A task response: {}", e)))?;

        let text = task
            .first_text()
            .unwrap_or("Advisor returned no answer.")
            .to_string();

        match task.status.state {
            TaskState::Completed => Ok(text),
            TaskState::Failed => Err(MeshError::AgentError(text)),
        }
    }
}

/// =============================
/// MCP Client
/// =============================

#[derive(Clone)]
pub struct McpClient {
    client: Client,
    base_url: String,
}

impl McpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let url = format!("{}/tools", self.base_url);

        let descriptors = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MeshError::ToolError(format!("Tool listing failed: {}", e)))?
            .json::<Vec<ToolDescriptor>>()
            .await
            .map_err(|e| MeshError::ToolError(format!("Invalid tool listing: {}", e)))?;

        Ok(descriptors)
    }

    /// Look up one tool's descriptor by its server-side name.
    pub async fn discover(&self, name: &str) -> Result<ToolDescriptor> {
        self.list_tools()
            .await?
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| MeshError::ToolNotFound(name.to_string()))
    }

    pub async fn call_tool(&self, name: &str, input: &str) -> Result<Value> {
        let url = format!("{}/call_tool", self.base_url);

        let request = ToolCallRequest {
            name: name.to_string(),
            arguments: json!({"input": input}),
        };

        debug!(url = %url, tool = %name, "Calling MCP tool");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MeshError::ToolError(format!("MCP request failed: {}", e)))?
            .json::<ToolCallResponse>()
            .await
            .map_err(|e| MeshError::ToolError(format!("Invalid MCP response: {}", e)))?;

        Ok(response.result)
    }
}

/// =============================
/// Meta-Agent Tool Wrappers
/// =============================

/// Remote advisor exposed to the routing model as a plain tool
pub struct AdvisorTool {
    client: A2aClient,
}

impl AdvisorTool {
    pub fn new(client: A2aClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for AdvisorTool {
    fn name(&self) -> &'static str {
        "FinancialAdvisor"
    }

    fn description(&self) -> &'static str {
        "Get expert financial intelligence and investment strategy advice."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input": {"type": "string", "description": "Question for the advisor"}
            },
            "required": ["input"]
        })
    }

    async fn execute(&self, input: &str) -> Result<Value> {
        match self.client.ask(input).await {
            Ok(answer) => Ok(Value::String(answer)),
            Err(e) => Ok(Value::String(format!("A2A expert error: {}", e))),
        }
    }
}

/// One MCP-hosted tool exposed under a routing-friendly alias
pub struct RemoteMcpTool {
    alias: &'static str,
    description: &'static str,
    error_prefix: &'static str,
    remote_name: String,
    schema: Value,
    client: McpClient,
}

impl RemoteMcpTool {
    /// Wrap a remote tool, fetching its descriptor for the input schema.
    pub async fn discover(
        client: McpClient,
        alias: &'static str,
        description: &'static str,
        error_prefix: &'static str,
        remote_name: &str,
    ) -> Result<Self> {
        let descriptor = client.discover(remote_name).await?;

        Ok(Self {
            alias,
            description,
            error_prefix,
            remote_name: descriptor.name,
            schema: descriptor.input_schema,
            client,
        })
    }
}

#[async_trait::async_trait]
impl Tool for RemoteMcpTool {
    fn name(&self) -> &'static str {
        self.alias
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn input_schema(&self) -> Value {
        self.schema.clone()
    }

    async fn execute(&self, input: &str) -> Result<Value> {
        match self.client.call_tool(&self.remote_name, input).await {
            Ok(result) => Ok(result),
            Err(e) => Ok(Value::String(format!("{}: {}", self.error_prefix, e))),
        }
    }
}

/// Assemble the three meta-agent tools against running servers.
pub async fn create_meta_tools(
    a2a_url: &str,
    mcp_url: &str,
) -> Result<Vec<Arc<dyn Tool>>> {
    let a2a = A2aClient::new(a2a_url);
    let mcp = McpClient::new(mcp_url);

    // Confirm the advisor is reachable before wiring it in
    match a2a.fetch_card().await {
        Ok(card) => debug!(agent = %card.name, "Discovered A2A agent"),
        Err(e) => warn!("A2A agent card unavailable: {}", e),
    }

    let equity = RemoteMcpTool::discover(
        mcp.clone(),
        "EquityAnalyzer",
        "Comprehensive equity analysis with stock metrics, price movements, and financial ratios.",
        "Stock data error",
        "equity_analyzer",
    )
    .await?;

    let intel = RemoteMcpTool::discover(
        mcp,
        "MarketIntelligence",
        "Real-time market intelligence and financial news gathering.",
        "News fetch error",
        "market_intelligence",
    )
    .await?;

    Ok(vec![
        Arc::new(AdvisorTool::new(a2a)) as Arc<dyn Tool>,
        Arc::new(equity),
        Arc::new(intel),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = McpClient::new("http://localhost:6001/");
        assert_eq!(client.base_url, "http://localhost:6001");

        let a2a = A2aClient::new("http://localhost:5001/");
        assert_eq!(a2a.base_url, "http://localhost:5001");
    }

    #[tokio::test]
    async fn test_advisor_tool_converts_failure_to_string() {
        // Nothing listening on this port; the wrapper must observe, not error
        let tool = AdvisorTool::new(A2aClient::new("http://127.0.0.1:9"));

        let result = tool.execute("hello").await.unwrap();
        let text = result.as_str().unwrap();
        assert!(text.starts_with("A2A expert error:"));
    }
}

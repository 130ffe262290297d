use financial_agent_mesh::mcp;
use financial_agent_mesh::tools::create_default_registry;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let port: u16 = std::env::var("MCP_PORT")
        .unwrap_or_else(|_| "6001".to_string())
        .parse()?;

    info!("🚀 MCP Financial Intelligence Server");
    info!("📍 Port: {}", port);

    let registry = Arc::new(create_default_registry());

    mcp::start_server(registry, port).await?;

    Ok(())
}

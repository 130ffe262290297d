use financial_agent_mesh::llm::OpenRouterClient;
use financial_agent_mesh::advisor;
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

    let api_key = std::env::var("OPENROUTER_API_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  OPENROUTER_API_KEY not set in .env");
        eprintln!("📌 The advisor will reject tasks until it is configured");
        String::new()
    });

    let port: u16 = std::env::var("A2A_PORT")
        .unwrap_or_else(|_| "5001".to_string())
        .parse()?;

    info!("🚀 Financial Intelligence Advisor - A2A Server");
    info!("📍 Port: {}", port);

    let chat = Arc::new(OpenRouterClient::new(api_key));

    advisor::start_server(chat, port).await?;

    Ok(())
}

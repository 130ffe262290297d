use financial_agent_mesh::agent::MetaAgent;
use financial_agent_mesh::llm::OpenRouterClient;
use financial_agent_mesh::remote::create_meta_tools;
use std::sync::Arc;

const DEFAULT_QUERY: &str = "I need to check Tesla and Microsoft stock performance \
today along with any breaking financial news";

fn print_troubleshooting() {
    println!("\nTroubleshooting:");
    println!("1. Make sure the A2A server is running: cargo run --bin advisor");
    println!("2. Make sure the MCP server is running: cargo run --bin tools");
    println!("3. Check that OPENROUTER_API_KEY is set in the .env file");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let a2a_url =
        std::env::var("A2A_URL").unwrap_or_else(|_| "http://localhost:5001".to_string());
    let mcp_url =
        std::env::var("MCP_URL").unwrap_or_else(|_| "http://localhost:6001".to_string());

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_QUERY.to_string());

    println!("🚀 Multi-Agent Financial Chatbot");
    println!("A2A + MCP Architecture");
    println!("{}", "=".repeat(50));
    println!("Requires:");
    println!("1. A2A server running at {}", a2a_url);
    println!("2. MCP server running at {}", mcp_url);
    println!("{}", "=".repeat(50));
    println!("Query: {}", query);
    println!("{}", "=".repeat(50));

    let chat = match OpenRouterClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: {}", e);
            print_troubleshooting();
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    let tools = match create_meta_tools(&a2a_url, &mcp_url).await {
        Ok(tools) => tools,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_troubleshooting();
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    let meta_agent = MetaAgent::new(chat, tools);

    match meta_agent.run(&query).await {
        Ok(result) => {
            println!("Meta-Agent Response:");
            println!("{}", result.output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_troubleshooting();
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}

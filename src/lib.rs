//! Multi-Agent Financial Chatbot Mesh
//!
//! Three cooperating pieces wired over HTTP:
//! - An A2A advisor server exposing one chat-style financial agent
//! - An MCP-style tool server exposing two finance tools
//! - A meta-agent that routes user queries to the advisor or the tools
//!
//! ROUTING LOOP:
//! QUERY → THINK → ACT (tool call) → OBSERVE → ... → FINAL ANSWER

pub mod advisor;
pub mod agent;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod models;
pub mod remote;
pub mod tickers;
pub mod tools;

pub use error::Result;

// Re-export common types
pub use models::*;

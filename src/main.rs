//! lgtm-dog-mcp: LGTM image generation MCP server

use anyhow::Result;
use lgtm_dog_mcp::mcp::LgtmMcpServer;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    // Respects RUST_LOG environment variable
    // Default level: info
    // stdout carries the MCP protocol, so logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lgtm_dog_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();

    info!("lgtm-dog-mcp server starting...");
    info!("Protocol: Model Context Protocol (MCP)");
    info!("Transport: stdio");

    let server = LgtmMcpServer::from_env()?;
    info!("Image source and output writer initialized");

    // This will handle MCP protocol communication via stdin/stdout
    let service = server.serve(stdio()).await?;

    info!("lgtm-dog-mcp server initialized successfully");
    info!("Server info: {:?}", service.peer_info());
    info!("Waiting for MCP requests...");

    // Blocks until the client disconnects
    service.waiting().await?;

    info!("lgtm-dog-mcp server shutting down");
    Ok(())
}

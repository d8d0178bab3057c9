//! mcp-scout server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use scout_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let state = state::ServerState::new(config)?;

    tracing::info!(
        enhance = state.has_model(),
        keyword_search = state.has_search(),
        "Starting mcp-scout server on stdio transport"
    );

    let handler = handler::ScoutServer::new(state);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}

mod config;
mod error;
mod prompts;
mod rate_limit;
mod server;
mod writer;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use toolbox_common::history::GenerationHistory;
use toolbox_common::openai::OpenAiClient;
use toolbox_common::redis::RedisCache;

use config::Config;
use rate_limit::RateLimiter;
use server::AiWriterServer;
use writer::WriterService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting ai-writer MCP server");

    let config = Config::from_env()?;
    info!(
        models = ?config.models.models(),
        base_url = %config.openai.base_url,
        rate_limit_rps = config.rate_limit_rps,
        "configuration loaded"
    );

    let redis = RedisCache::new(config.redis_url.as_deref());
    if redis.is_configured() && !redis.is_available().await {
        warn!("redis configured but not reachable, history disabled until it comes back");
    }
    let history =
        GenerationHistory::new(redis, config.history_max_entries, config.history_ttl_secs);

    let client = Arc::new(OpenAiClient::new(config.openai.clone())?);
    let writer = WriterService::new(
        client,
        config.models.clone(),
        history,
        RateLimiter::new(config.rate_limit_rps),
    );
    let server = AiWriterServer::new(writer);

    if let Some(addr) = config.tcp_listen_addr {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}

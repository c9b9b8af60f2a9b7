//! Reference MCP Server - Entry Point
//!
//! Provides both stdio and HTTP transports.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use reference_mcp::{ResultCache, config::Config, providers, server::McpServer, tools::ToolContext};

#[derive(Parser, Debug)]
#[command(name = "reference-mcp")]
#[command(about = "MCP server aggregating academic search results into BibTeX references")]
#[command(version)]
struct Cli {
    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY")]
    api_key: Option<String>,

    /// Contact email for the OpenAlex polite pool
    #[arg(long, env = "OPENALEX_MAILTO")]
    mailto: Option<String>,

    /// Transport mode: stdio or http
    #[arg(long, default_value = "stdio")]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Result cache TTL in seconds
    #[arg(long, env = "REFERENCE_CACHE_TTL_SECS")]
    cache_ttl_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// Streamable HTTP
    Http,
}

/// Logs go to stderr; stdout carries the stdio protocol.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        "Starting reference MCP server"
    );

    let mut config = Config::new(cli.api_key, cli.mailto);
    if let Some(secs) = cli.cache_ttl_secs {
        config = config.with_result_cache_ttl(Duration::from_secs(secs));
    }

    let providers = providers::get_providers(None, &config)?;
    tracing::info!(
        providers = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
        api_key = config.has_api_key(),
        "Providers ready"
    );

    let cache = Arc::new(ResultCache::from_config(&config));
    tracing::info!(ttl = ?cache.ttl(), "Result cache ready");
    let cleanup = Arc::clone(&cache).start_cleanup_task();

    let server = McpServer::new(ToolContext::new(providers, Arc::clone(&cache)));

    let result = match cli.transport {
        Transport::Stdio => server.run_stdio().await,
        Transport::Http => server.run_http(cli.port).await,
    };

    cleanup.abort();
    cache.clear().await;

    result
}

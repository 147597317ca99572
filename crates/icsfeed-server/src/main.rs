//! icsfeed server entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use icsfeed_core::{TracingConfig, init_tracing};
use icsfeed_providers::CredentialRegistry;
use tokio::net::TcpListener;
use tracing::{info, warn};

use icsfeed_server::cli::Cli;
use icsfeed_server::{ServerConfig, ServerResult, SignalHandler, build_state, serve};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli, dotenv.ok()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, dotenv: Option<PathBuf>) -> ServerResult<()> {
    let tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::server()
    }
    .with_format(cli.log_format.into());
    init_tracing(tracing_config)?;

    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let mut config = match cli.config {
        Some(ref path) => ServerConfig::load_from(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config = config.with_bind(bind);
    }
    if let Some(url) = cli.upstream_url {
        config = config.with_base_url(url);
    }

    let registry = CredentialRegistry::from_env();
    if registry.is_empty() {
        warn!("no feed tokens configured; set ICSFEED_TOKEN_<ID> variables");
    } else {
        info!(feeds = registry.len(), "loaded feed credentials");
    }

    let state = build_state(&config, registry)?;
    let listener = TcpListener::bind(config.bind_addr()?).await?;

    let signals = SignalHandler::new();
    signals.spawn_listener();

    serve(listener, state, signals.shutdown().wait()).await
}

//! HTTP front end for caption retrieval.
//!
//! Serves `/transcript` (one JSON response) and `/transcript/stream`
//! (Server-Sent Events, one message per resolution event).

mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ytscript_core::Config;

use crate::http::create_router;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const APP_NAME: &str = "ytscript-server";

#[derive(Parser)]
#[command(name = APP_NAME, version, about = "Serve YouTube captions over HTTP")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind, overrides [server].host
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides [server].port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    tracing::info!("{} v{} starting", APP_NAME, VERSION);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let state = AppState::from_config(&config)?;
    tracing::info!(providers = ?state.orchestrator.providers(), "Strategies ready");

    let app = create_router(state);

    let addr = config.server.bind_addr();
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ytscript_server=info,ytscript_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

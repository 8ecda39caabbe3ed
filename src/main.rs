//! Prerender gateway entry point.
//!
//! Loads configuration, wires up observability, and runs the HTTP host the
//! config selects: static SPA serving in production, dev-server proxying in
//! development. Both apply the same crawler/snapshot selection first.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use prerender_gateway::admin::{setup_admin_router, AdminState};
use prerender_gateway::config::loader::load_config;
use prerender_gateway::config::watcher::ConfigWatcher;
use prerender_gateway::config::GatewayConfig;
use prerender_gateway::http::HttpServer;
use prerender_gateway::lifecycle::Shutdown;
use prerender_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "prerender-gateway")]
#[command(about = "Serves prerendered snapshots to crawlers, the SPA to everyone else")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        static_dir = %config.prerender.static_dir,
        routes = config.prerender.routes.len(),
        upstream = config.upstream.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Config watcher only makes sense when a file was given.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            (updates, Some(handle))
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config.clone())?;

    if config.admin.enabled {
        let admin_state = AdminState {
            app: server.state(),
            api_key: std::sync::Arc::new(config.admin.api_key.clone()),
        };
        let admin_router = setup_admin_router(admin_state);
        let admin_listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %admin_listener.local_addr()?, "Admin endpoint listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(admin_listener, admin_router).await {
                tracing::error!(error = %e, "Admin endpoint stopped");
            }
        });
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ordergate::config::OrdergateConfig;
use ordergate::http::{router, AppState, HttpServer};
use ordergate::orders::{InMemorySalesOrderRepository, SalesOrderService};
use ordergate::ratelimit::spawn_sweeper;

#[derive(Parser, Debug)]
#[command(
    name = "ordergate",
    version,
    about = "Sales order API with per-client admission control"
)]
struct Args {
    /// Path to a configuration file (YAML, TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to serve HTTP on
    #[arg(long)]
    http_addr: Option<SocketAddr>,

    /// Requests admitted per client per window
    #[arg(long)]
    max_requests: Option<u64>,

    /// Window length in seconds
    #[arg(long)]
    window_secs: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting Ordergate Sales Order API");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = OrdergateConfig::load(args.config.as_deref())?;
    if let Some(addr) = args.http_addr {
        config.server.http_addr = addr;
    }
    if let Some(max) = args.max_requests {
        config.rate_limiting.max_requests_per_window = max;
    }
    if let Some(secs) = args.window_secs {
        config.rate_limiting.window_secs = secs;
    }
    config.validate()?;
    info!(
        http_addr = %config.server.http_addr,
        max_requests = config.rate_limiting.max_requests_per_window,
        window_secs = config.rate_limiting.window_secs,
        "Configuration loaded"
    );

    let limiter = Arc::new(AppState::limiter_from_config(&config));
    let repository = Arc::new(InMemorySalesOrderRepository::new());
    let orders = Arc::new(SalesOrderService::new(repository));
    let state = AppState::new(&config, Arc::clone(&limiter), orders);

    let sweeper = spawn_sweeper(
        Arc::clone(&limiter),
        Duration::from_secs(config.rate_limiting.sweep_interval_secs),
    );

    let server = HttpServer::bind(config.server.http_addr, router(state)).await?;

    // Run the server with graceful shutdown on Ctrl+C
    server.serve_with_shutdown(shutdown_signal()).await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    info!("Ordergate stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

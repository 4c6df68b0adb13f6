//! Todo Server
//!
//! Serves the to-do item API on top of the storage backend picked with
//! `--db` (or `TODO_DB`).

use anyhow::{Context, Result};
use clap::Parser;
use todo_server::config::ServerArgs;
use todo_server::storage;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let mut args = ServerArgs::parse();
    args.store = args.store.with_env_aliases(|name| std::env::var(name).ok());

    init_tracing(args.verbose);

    info!("Starting todo server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(args).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }
}

async fn run_server(args: ServerArgs) -> Result<()> {
    info!("Initializing {} store...", args.db);
    let store = storage::connect(args.db, &args.store)
        .await
        .with_context(|| format!("Failed to initialize {} store", args.db))?;
    info!("{} store initialized", store.backend());

    let app = todo_server::app(store.clone());

    let listener = tokio::net::TcpListener::bind(args.address)
        .await
        .with_context(|| format!("Failed to bind to {}", args.address))?;
    info!("Server listening on {}", args.address);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    info!("Server stopped, closing {} store", store.backend());
    store.close().await;

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

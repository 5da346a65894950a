// ABOUTME: Server binary for the Trenera fitness marketplace API
// ABOUTME: Loads configuration, connects storage, selects the gateway backend, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! # Trenera Marketplace Server Binary
//!
//! Starts the marketplace API with durable sqlite storage and the configured
//! payment gateway backend (Kaspi QR, or the in-memory mock for development).

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use trenera_server::{
    config::ServerConfig,
    context::ServerResources,
    database_plugins::{factory::Database, DatabaseProvider},
    logging,
    payments::{KaspiClient, MockGateway, PaymentGateway},
    routes,
};

/// Command-line overrides for environment-driven configuration
#[derive(Parser)]
#[command(name = "trenera-server")]
#[command(about = "Trenera fitness marketplace API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = trenera_server::config::DatabaseUrl::parse_url(&database_url);
    }

    logging::init_from_env()?;
    info!("Starting Trenera marketplace server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!("Database initialized: {}", database.backend_info());

    let gateway: Arc<dyn PaymentGateway> = if config.gateway.use_mock {
        info!("Using mock payment gateway");
        Arc::new(MockGateway::new())
    } else {
        info!(base_url = %config.gateway.base_url, "Using Kaspi QR payment gateway");
        Arc::new(KaspiClient::new(config.gateway.clone()))
    };

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        Arc::new(database),
        gateway,
        Arc::new(config),
    ));
    let app = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_port)).await?;
    info!(port = http_port, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives a termination signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

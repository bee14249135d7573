use std::{path::PathBuf, sync::Arc};

use bookshelf::{
    mongodb::MongoDbStore,
    prelude::*,
    telemetry::setup_tracing,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// HTTP book service backed by MongoDB
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to
    #[arg(long)]
    port: Option<u16>,

    /// MongoDB connection string
    #[arg(long)]
    mongo_uri: Option<String>,

    /// Database holding the Book collection
    #[arg(long)]
    database: Option<String>,

    /// Store connect and server-selection timeout, in seconds
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// Deadline for each store operation, in seconds
    #[arg(long)]
    operation_timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(mongo_uri) = self.mongo_uri {
            config.mongo_uri = mongo_uri;
        }
        if let Some(database) = self.database {
            config.database = database;
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.operation_timeout_secs {
            config.operation_timeout_secs = secs;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = Cli::parse().into_config()?;
    info!(database = %config.database, "starting bookshelf");

    let backend = MongoDbStore::builder(&config.mongo_uri, &config.database)
        .connect_timeout(config.connect_timeout())
        .build()
        .await?;

    // An unreachable store is not fatal; requests fail until it comes back.
    match backend.ping().await {
        Ok(()) => info!("connected to document store"),
        Err(err) => warn!(error = %err, "document store unreachable at startup"),
    }

    let books = BookRepository::new(DocumentStore::new(backend.clone()), config.operation_timeout());
    let app = router(AppState::new(Arc::new(books), Arc::new(BookCatalog::seeded())));

    let listener = TcpListener::bind(config.socket_addr()).await?;
    info!(addr = %config.socket_addr(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    backend.shutdown().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
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
}

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use fragmenta_server::api::AppState;
use fragmenta_server::auth::AuthProvider;
use fragmenta_server::config::FragmentaConfig;
use fragmenta_server::{store_factory, telemetry};
use fragmenta_store::FragmentStore;

/// Fragmenta fragment store HTTP server.
#[derive(Parser, Debug)]
#[command(name = "fragmenta-server", about = "Multi-tenant fragment store over HTTP")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "fragmenta.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config: FragmentaConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        toml::from_str("")?
    };

    telemetry::init();

    if !Path::new(&cli.config).exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    // Create the storage backend and the store facade over it.
    let backend = store_factory::create_backend(&config.storage).await?;
    info!(backend = %config.storage.backend, "fragment backend initialized");
    let fragments = FragmentStore::new(backend);

    // Build the auth provider.
    let auth = Arc::new(AuthProvider::new(&config.auth)?);

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let external_url = config
        .server
        .external_url
        .unwrap_or_else(|| format!("http://{addr}"));

    let state = AppState {
        fragments,
        auth,
        external_url,
        max_fragment_bytes: config.server.max_fragment_bytes,
    };
    let app = fragmenta_server::api::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "fragmenta-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fragmenta-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}

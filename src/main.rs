use app_backend::{
    app::AppModule,
    config::{ConfigOptions, database::parse_port},
    errors::Result,
};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// HTTP listen port when `PORT` is not set.
const DEFAULT_HTTP_PORT: &str = "3000";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load configuration and open the database pool
    let module = AppModule::initialize(ConfigOptions::default())
        .await
        .inspect(|_| info!("Application module initialized."))
        .inspect_err(|e| error!("Failed to initialize application module: {}", e))?;

    // 3. Serve until Ctrl-C
    let port = parse_port("PORT", module.config().get_or("PORT", DEFAULT_HTTP_PORT))?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", addr, e))?;
    info!("Listening on {}", addr);

    axum::serve(listener, module.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 4. Release the pool
    module.shutdown().await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

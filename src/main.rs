use std::sync::Arc;

use anyhow::Result;
use harvester::{
    app_state::AppState,
    config::Config,
    routes::create_router,
    sink::{ResultSink, postgres::PostgresSink},
};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    let sink: Option<Arc<dyn ResultSink>> = match config.database_url() {
        Some(database_url) => {
            let sink = PostgresSink::connect(database_url).await?;
            info!("result sink connected");
            Some(Arc::new(sink) as Arc<dyn ResultSink>)
        }
        None => {
            warn!("DATABASE_URL not set, saveToDb requests will not be persisted");
            None
        }
    };

    let state = AppState::from_config(&config, sink);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = config.bind_addr(),
        strategy = %config.strategy(),
        "harvester listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

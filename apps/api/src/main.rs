use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hrm::config::Config;
use hrm::db::create_pool;
use hrm::routes::build_router;
use hrm::state::AppState;
use hrm::store::seed::seed_demo_data;
use hrm::store::{HrStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Malformed env values fail here, before anything else starts
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HRM API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn HrStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => {
            info!("DATABASE_URL not set, keeping records in memory");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_demo_data {
        seed_demo_data(store.as_ref()).await?;
    }

    info!(
        "Simulated AI delay: {}ms",
        config.simulated_delay.as_millis()
    );

    let state = AppState::new(store, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gsc_backend::{Config, GscError, GscState, db::CarsStorage, gsc_router, secrets};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), GscError> {
    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    run(cfg).await.inspect_err(|e| error!(error = %e, "startup failed"))
}

async fn run(cfg: Config) -> Result<(), GscError> {
    let source = secrets::from_config(&cfg)?;
    let database_url = source.resolve().await?;
    info!(
        source = source.describe(),
        database_url = %secrets::redact(&database_url),
        "resolved database URL"
    );

    let storage = CarsStorage::connect(&database_url, cfg.database_max_connections).await?;

    let state = GscState::new(Arc::new(storage));
    let app = gsc_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

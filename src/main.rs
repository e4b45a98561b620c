use mimalloc::MiMalloc;
use pitfall::config::Config;
use pitfall::db::UserStore;
use pitfall::router::{PitfallState, pitfall_router};
use pitfall::service::evaluator::build_evaluator;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

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

    info!(
        listen_addr = %cfg.listen_addr,
        database_url = %cfg.database_url,
        loglevel = %cfg.loglevel,
        evaluator = ?cfg.evaluator,
        markup = ?cfg.markup
    );

    // Wipes whatever a previous run left behind.
    let store = UserStore::new(&cfg.database_url)?;
    store.reset().await?;

    let evaluator = build_evaluator(&cfg)?;
    let state = PitfallState::new(store, evaluator, cfg.markup);
    let app = pitfall_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

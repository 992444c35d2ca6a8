use axum::{routing::get, Router};
use f1stats::{
    config::AppConfig,
    data::Snapshot,
    shared::AppState,
    stats::{handlers, DataSource, StatsServiceFactory},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "f1stats=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(backend = %config.backend, "Starting race statistics server");

    let source = match (&config.database_url, &config.snapshot_path) {
        (Some(database_url), _) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            info!("Connected to PostgreSQL");
            DataSource::Postgres(pool)
        }
        (None, Some(path)) => DataSource::InMemory(Arc::new(Snapshot::from_json_file(path)?)),
        (None, None) => {
            warn!("Neither DATABASE_URL nor F1STATS_SNAPSHOT is set, serving an empty dataset");
            DataSource::InMemory(Arc::new(Snapshot::default()))
        }
    };

    let app_state = AppState::new(StatsServiceFactory::create(config.backend, &source));

    let app = Router::new()
        .route("/", get(|| async { "f1stats" }))
        .merge(handlers::router())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

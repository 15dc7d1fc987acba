//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use botcast_common::{AppConfig, AppError};
use botcast_core::SnowflakeGenerator;
use botcast_db::{
    create_pool, PgBroadcastRepository, PgButtonRepository, PgClickEventRepository,
    PgSegmentRepository, PgVariantRepository,
};
use botcast_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;
use crate::transport::LoggingTransport;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = state.config().cors.clone();
    let is_production = state.config().app.env.is_production();

    let router = create_router().merge(health_routes());
    let router = apply_middleware(router, &cors, is_production);
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = botcast_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.dispatch.worker_id));

    // Repositories
    let broadcast_repo = Arc::new(PgBroadcastRepository::new(pool.clone()));
    let variant_repo = Arc::new(PgVariantRepository::new(pool.clone()));
    let button_repo = Arc::new(PgButtonRepository::new(pool.clone()));
    let click_repo = Arc::new(PgClickEventRepository::new(pool.clone()));
    let segment_repo = Arc::new(PgSegmentRepository::new(pool.clone()));

    // The external delivery service is integrated by swapping this
    // transport for a real one
    let transport = Arc::new(LoggingTransport);

    let service_context = ServiceContextBuilder::new()
        .broadcast_repo(broadcast_repo)
        .variant_repo(variant_repo)
        .button_repo(button_repo)
        .click_repo(click_repo)
        .segment_repo(segment_repo)
        .transport(transport)
        .snowflake_generator(snowflake_generator)
        .dispatch_config(config.dispatch.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}

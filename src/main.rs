use axum::Router;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registrar::config::CONFIG;
use registrar::db;
use registrar::endpoints::create_router;
use registrar::services::audit::AuditService;
use registrar::services::fees::FeeCalculator;
use registrar::services::notification::NotificationService;
use registrar::services::storage::StorageService;
use registrar::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "registrar={},tower_http=info",
                    CONFIG.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Registrar backend v{}", env!("CARGO_PKG_VERSION"));

    // Connect to the database and run migrations
    let db = db::connect().await?;
    tracing::info!("Database connection established");

    // Wire shared services
    let fees = FeeCalculator::new(CONFIG.fees.clone());
    let audit = AuditService::new(db.clone());
    let notification = NotificationService::new();
    notification.init_from_config(&CONFIG.smtp).await;
    let storage = StorageService::new(
        CONFIG.storage.upload_dir.clone(),
        &CONFIG.storage.public_base_url,
    );
    tokio::fs::create_dir_all(&CONFIG.storage.upload_dir).await?;

    let state = AppState::new(db, fees, audit, notification, storage);

    // Build the application
    let app = create_app(state);

    // Determine bind address
    let addr: SocketAddr = format!("{}:{}", CONFIG.server.host, CONFIG.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application router
fn create_app(state: AppState) -> Router {
    // Explicit origins when configured, otherwise wide open (dev)
    let cors = if CONFIG.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = CONFIG
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // API routes
    let api_router = create_router(state);

    // Uploaded documents are served read-only under /files
    let files_service = ServeDir::new(&CONFIG.storage.upload_dir);

    Router::new()
        .merge(api_router)
        .nest_service("/files", files_service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub mod auth;
pub mod dashboard;
pub mod enrollments;
pub mod fees;
pub mod payments;
pub mod programs;
pub mod registrations;
pub mod setup;
pub mod students;

use axum::{middleware as axum_middleware, Router};

use crate::config::CONFIG;
use crate::middleware::require_auth;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", axum::routing::get(health_check))
        .route("/api/version", axum::routing::get(get_version))
        .nest("/auth", auth::auth_routes(state.clone()))
        .nest("/api/setup", setup::setup_routes(state.clone()))
        .nest("/api/register", registrations::public_routes(state.clone()));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .nest("/api", api_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    // Merge public and protected routes
    public_routes.merge(protected_routes)
}

/// API routes under /api/* (protected by auth middleware)
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/me", axum::routing::get(auth::me))
        .with_state(state.clone())
        .nest(
            "/registrations",
            registrations::admin_routes(state.clone()),
        )
        .nest("/students", students::students_routes(state.clone()))
        .nest("/programs", programs::programs_routes(state.clone()))
        .nest("/enrollments", enrollments::enrollments_routes(state.clone()))
        .nest("/payments", payments::payments_routes(state.clone()))
        .nest("/fees", fees::fees_routes(state.clone()))
        .nest("/dashboard", dashboard::dashboard_routes(state.clone()))
        .nest("/audit", audit_routes(state))
}

fn audit_routes(state: AppState) -> Router {
    use axum::extract::{Query, State};
    use axum::Json;

    use crate::error::Result;
    use crate::middleware::{AuditView, Authorized};
    use crate::services::audit::{get_audit_logs, AuditLogQuery, AuditLogResponse};

    async fn list_audit_logs(
        Authorized(_admin, _): Authorized<AuditView>,
        State(state): State<AppState>,
        Query(query): Query<AuditLogQuery>,
    ) -> Result<Json<AuditLogResponse>> {
        let response = get_audit_logs(&state.db, query).await?;
        Ok(Json(response))
    }

    Router::new()
        .route("/", axum::routing::get(list_audit_logs))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "version": CONFIG.version,
        "backend": "rust"
    }))
}

//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`, except `/health`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/licenses", get(handlers::license::list_licenses))
        // Sessions
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route(
            "/sessions/{id}/validate",
            get(handlers::session::validate_session),
        )
        .route(
            "/sessions/{id}/submit",
            post(handlers::session::submit_session),
        )
        .route(
            "/sessions/{id}/license",
            put(handlers::session::select_license),
        )
        .route(
            "/sessions/{id}/settings",
            put(handlers::session::update_settings),
        )
        .route(
            "/sessions/{id}/events",
            get(handlers::events::session_events),
        )
        // Platforms
        .route(
            "/sessions/{id}/platforms/{platform}/enabled",
            put(handlers::platform::set_enabled),
        )
        .route(
            "/sessions/{id}/platforms/{platform}/prompt",
            put(handlers::platform::set_prompt),
        )
        .route(
            "/sessions/{id}/platforms/{platform}/feed/{metric}/step",
            post(handlers::platform::step_feed),
        )
        .route(
            "/sessions/{id}/platforms/{platform}/feed/{metric}",
            put(handlers::platform::set_feed),
        )
        .route(
            "/sessions/{id}/platforms/{platform}/targets",
            post(handlers::platform::open_add),
        )
        .route(
            "/sessions/{id}/platforms/{platform}/targets/{index}/edit",
            post(handlers::platform::open_edit),
        )
        .route(
            "/sessions/{id}/platforms/{platform}/targets/{index}",
            delete(handlers::platform::remove_target),
        )
        // Target editor
        .route(
            "/sessions/{id}/editor",
            delete(handlers::editor::discard),
        )
        .route(
            "/sessions/{id}/editor/label",
            put(handlers::editor::set_label),
        )
        .route(
            "/sessions/{id}/editor/commit",
            post(handlers::editor::commit),
        )
        .route(
            "/sessions/{id}/editor/{metric}/step",
            post(handlers::editor::step_value),
        )
        .route(
            "/sessions/{id}/editor/{metric}",
            put(handlers::editor::set_value),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_router_builds_without_route_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(dir.path()).await.unwrap();
        let _router = build_router(state);
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let axum::Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}

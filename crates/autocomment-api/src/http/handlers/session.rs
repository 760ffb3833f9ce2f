//! Session lifecycle HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions                - Open a session on the stored configuration
//! - GET    /api/v1/sessions/{id}           - Current snapshot
//! - DELETE /api/v1/sessions/{id}           - Close without saving
//! - GET    /api/v1/sessions/{id}/validate  - Whole-form validation
//! - POST   /api/v1/sessions/{id}/submit    - Validate and persist
//! - PUT    /api/v1/sessions/{id}/license   - Select the license
//! - PUT    /api/v1/sessions/{id}/settings  - Brand voice / product flags

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use autocomment_core::surface::SurfaceSnapshot;
use autocomment_types::draft::{GlobalSettingsUpdate, StoredConfiguration};
use autocomment_types::violation::Violation;

use super::session_entry;
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for selecting a license.
#[derive(Debug, Deserialize)]
pub struct SelectLicenseRequest {
    pub license_id: String,
}

/// Result of whole-form validation.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

/// Response body for closing a session.
#[derive(Debug, Serialize)]
pub struct ClosedSession {
    pub closed: bool,
    pub session_id: String,
}

/// POST /api/v1/sessions - Open an editing session for the caller.
pub async fn create_session(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<SurfaceSnapshot>>, AppError> {
    let start = Instant::now();

    let surface = state.service.open_session(&auth.owner_id).await?;
    let snapshot = surface.snapshot();
    let id = state.host_session(&auth.owner_id, surface);

    let self_link = format!("/api/v1/sessions/{id}");
    let events_link = format!("/api/v1/sessions/{id}/events");
    Ok(Json(
        ApiResponse::timed(snapshot, start)
            .with_link("self", &self_link)
            .with_link("events", &events_link),
    ))
}

/// GET /api/v1/sessions/{id} - Current snapshot of a session.
pub async fn get_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SurfaceSnapshot>>, AppError> {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let surface = entry.surface.lock().await;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// DELETE /api/v1/sessions/{id} - Close a session without saving.
pub async fn delete_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ClosedSession>>, AppError> {
    let start = Instant::now();
    let uuid = super::parse_uuid(&id)?;
    if !state.close_session(uuid, &auth.owner_id) {
        return Err(AppError::SessionNotFound(uuid));
    }
    tracing::info!(owner_id = %auth.owner_id, session_id = %uuid, "session closed");
    Ok(Json(ApiResponse::timed(
        ClosedSession {
            closed: true,
            session_id: uuid.to_string(),
        },
        start,
    )))
}

/// GET /api/v1/sessions/{id}/validate - Every violation of the current draft.
pub async fn validate_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ValidationReport>>, AppError> {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let violations = entry.surface.lock().await.validate_all();
    Ok(Json(ApiResponse::timed(
        ValidationReport {
            valid: violations.is_empty(),
            violations,
        },
        start,
    )))
}

/// POST /api/v1/sessions/{id}/submit - Validate and persist the draft.
///
/// The session stays open either way, so a rejected or failed submit can be
/// fixed and retried.
pub async fn submit_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StoredConfiguration>>, AppError> {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let surface = entry.surface.lock().await;
    let stored = state.service.submit(&auth.owner_id, &surface).await?;
    Ok(Json(ApiResponse::timed(stored, start)))
}

/// PUT /api/v1/sessions/{id}/license - Select the license to configure under.
pub async fn select_license(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<SelectLicenseRequest>,
) -> Result<Json<ApiResponse<SurfaceSnapshot>>, AppError> {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let mut surface = entry.surface.lock().await;
    surface.select_license(&body.license_id)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// PUT /api/v1/sessions/{id}/settings - Update the pass-through global flags.
pub async fn update_settings(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<GlobalSettingsUpdate>,
) -> Result<Json<ApiResponse<SurfaceSnapshot>>, AppError> {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let mut surface = entry.surface.lock().await;
    surface.update_settings(body)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

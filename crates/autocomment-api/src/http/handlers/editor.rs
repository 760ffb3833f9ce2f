//! Target editor HTTP handlers. The editor is opened through the platform
//! target endpoints and then driven here until it is committed or discarded.
//!
//! Endpoints:
//! - PUT    /api/v1/sessions/{id}/editor/label
//! - POST   /api/v1/sessions/{id}/editor/{metric}/step
//! - PUT    /api/v1/sessions/{id}/editor/{metric}
//! - POST   /api/v1/sessions/{id}/editor/commit
//! - DELETE /api/v1/sessions/{id}/editor?confirm=

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use autocomment_core::surface::SurfaceSnapshot;

use super::platform::{StepRequest, ValueRequest};
use super::{parse_metric, session_entry};
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::DiscardQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LabelRequest {
    pub label: String,
}

type SnapshotResult = Result<Json<ApiResponse<SurfaceSnapshot>>, AppError>;

/// PUT .../editor/label
pub async fn set_label(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<LabelRequest>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let mut surface = entry.surface.lock().await;
    surface.set_draft_label(body.label)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// POST .../editor/{metric}/step
pub async fn step_value(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, metric)): Path<(String, String)>,
    Json(body): Json<StepRequest>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let metric = parse_metric(&metric)?;
    let mut surface = entry.surface.lock().await;
    surface.step_draft(metric, body.delta)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// PUT .../editor/{metric}
pub async fn set_value(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, metric)): Path<(String, String)>,
    Json(body): Json<ValueRequest>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let metric = parse_metric(&metric)?;
    let mut surface = entry.surface.lock().await;
    surface.set_draft_value(metric, body.value)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// POST .../editor/commit
pub async fn commit(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let mut surface = entry.surface.lock().await;
    surface.commit_target()?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// DELETE .../editor?confirm=true
pub async fn discard(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Query(query): Query<DiscardQuery>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let mut surface = entry.surface.lock().await;
    surface.discard_target(query.confirm)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

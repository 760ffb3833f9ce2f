//! License listing.
//!
//! Endpoints:
//! - GET /api/v1/licenses - Available licenses of the caller, keys masked

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use autocomment_types::license::{License, LicenseStatus};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// A license as exposed over HTTP. The full key never leaves the server.
#[derive(Debug, Serialize)]
pub struct LicenseView {
    pub id: String,
    pub name: String,
    pub key: String,
    pub status: LicenseStatus,
}

impl From<&License> for LicenseView {
    fn from(license: &License) -> Self {
        Self {
            id: license.id.clone(),
            name: license.name.clone(),
            key: license.masked_key(),
            status: license.status,
        }
    }
}

/// GET /api/v1/licenses
pub async fn list_licenses(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<LicenseView>>>, AppError> {
    let start = Instant::now();
    let licenses = state.service.licenses(&auth.owner_id).await?;
    let views = licenses.iter().map(LicenseView::from).collect();
    Ok(Json(ApiResponse::timed(views, start)))
}

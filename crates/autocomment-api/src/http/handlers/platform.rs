//! Per-platform HTTP handlers: enablement, prompt settings, the feed bucket
//! and target list entry points.
//!
//! Endpoints:
//! - PUT    /api/v1/sessions/{id}/platforms/{platform}/enabled
//! - PUT    /api/v1/sessions/{id}/platforms/{platform}/prompt
//! - POST   /api/v1/sessions/{id}/platforms/{platform}/feed/{metric}/step
//! - PUT    /api/v1/sessions/{id}/platforms/{platform}/feed/{metric}
//! - POST   /api/v1/sessions/{id}/platforms/{platform}/targets              - Open the editor to add
//! - POST   /api/v1/sessions/{id}/platforms/{platform}/targets/{index}/edit - Open the editor on a target
//! - DELETE /api/v1/sessions/{id}/platforms/{platform}/targets/{index}

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use autocomment_core::surface::SurfaceSnapshot;
use autocomment_types::budget::PromptSettings;

use super::{parse_index, parse_metric, parse_platform, session_entry};
use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnabledRequest {
    pub enabled: bool,
}

/// Body for step endpoints. `delta` is usually `1` or `-1`.
#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub delta: i64,
}

/// Body for direct numeric entry.
#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    pub value: u32,
}

type SnapshotResult = Result<Json<ApiResponse<SurfaceSnapshot>>, AppError>;

/// PUT .../platforms/{platform}/enabled
pub async fn set_enabled(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, platform)): Path<(String, String)>,
    Json(body): Json<EnabledRequest>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let platform = parse_platform(&platform)?;
    let mut surface = entry.surface.lock().await;
    surface.set_platform_enabled(platform, body.enabled)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// PUT .../platforms/{platform}/prompt
pub async fn set_prompt(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, platform)): Path<(String, String)>,
    Json(body): Json<PromptSettings>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let platform = parse_platform(&platform)?;
    let mut surface = entry.surface.lock().await;
    surface.set_prompt_settings(platform, body)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// POST .../platforms/{platform}/feed/{metric}/step
pub async fn step_feed(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, platform, metric)): Path<(String, String, String)>,
    Json(body): Json<StepRequest>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let platform = parse_platform(&platform)?;
    let metric = parse_metric(&metric)?;
    let mut surface = entry.surface.lock().await;
    surface.step_feed(platform, metric, body.delta)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// PUT .../platforms/{platform}/feed/{metric}
pub async fn set_feed(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, platform, metric)): Path<(String, String, String)>,
    Json(body): Json<ValueRequest>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let platform = parse_platform(&platform)?;
    let metric = parse_metric(&metric)?;
    let mut surface = entry.surface.lock().await;
    surface.set_feed(platform, metric, body.value)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// POST .../platforms/{platform}/targets
pub async fn open_add(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, platform)): Path<(String, String)>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let platform = parse_platform(&platform)?;
    let mut surface = entry.surface.lock().await;
    surface.open_add(platform)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// POST .../platforms/{platform}/targets/{index}/edit
pub async fn open_edit(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, platform, index)): Path<(String, String, String)>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let platform = parse_platform(&platform)?;
    let index = parse_index(&index)?;
    let mut surface = entry.surface.lock().await;
    surface.open_edit(platform, index)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

/// DELETE .../platforms/{platform}/targets/{index}
pub async fn remove_target(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, platform, index)): Path<(String, String, String)>,
) -> SnapshotResult {
    let start = Instant::now();
    let entry = session_entry(&state, &id, &auth)?;
    let platform = parse_platform(&platform)?;
    let index = parse_index(&index)?;
    let mut surface = entry.surface.lock().await;
    surface.remove_target(platform, index)?;
    Ok(Json(ApiResponse::timed(surface.snapshot(), start)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::session::create_session;
    use crate::http::handlers::test_support::{alice, licensed_state};
    use autocomment_types::platform::Platform;

    async fn open(state: &AppState) -> String {
        let Json(body) = create_session(State(state.clone()), alice()).await.unwrap();
        body.data.unwrap().session_id.to_string()
    }

    fn linkedin(snapshot: &SurfaceSnapshot) -> &autocomment_core::allocation::store::BudgetSummary {
        snapshot
            .platforms
            .iter()
            .find(|p| p.platform == Platform::Linkedin)
            .and_then(|p| p.budget.as_ref())
            .unwrap()
    }

    #[tokio::test]
    async fn test_feed_step_and_refusal() {
        let (state, _dir) = licensed_state().await;
        let id = open(&state).await;

        // LinkedIn seed: feed 5/5, #sales 5/3. Likes are saturated.
        let path = || Path((id.clone(), "linkedin".to_string(), "likes".to_string()));
        let err = step_feed(State(state.clone()), alice(), path(), Json(StepRequest { delta: 1 }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CAPACITY_EXCEEDED");

        let Json(body) =
            step_feed(State(state.clone()), alice(), path(), Json(StepRequest { delta: -1 }))
                .await
                .unwrap();
        let snapshot = body.data.unwrap();
        assert_eq!(linkedin(&snapshot).feed.likes, 4);
        assert_eq!(linkedin(&snapshot).remaining.likes, 1);

        let err = set_feed(State(state), alice(), path(), Json(ValueRequest { value: 9 }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CAPACITY_EXCEEDED");
    }

    #[tokio::test]
    async fn test_open_add_refused_when_saturated() {
        let (state, _dir) = licensed_state().await;
        let id = open(&state).await;

        // Comments 5 + 3 leave 2; filling the feed saturates both metrics.
        set_feed(
            State(state.clone()),
            alice(),
            Path((id.clone(), "linkedin".to_string(), "comments".to_string())),
            Json(ValueRequest { value: 7 }),
        )
        .await
        .unwrap();

        let err = open_add(
            State(state.clone()),
            alice(),
            Path((id.clone(), "LINKEDIN".to_string())),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "PLATFORM_SATURATED");
    }

    #[tokio::test]
    async fn test_enable_and_remove_target() {
        let (state, _dir) = licensed_state().await;
        let id = open(&state).await;

        let Json(body) = set_enabled(
            State(state.clone()),
            alice(),
            Path((id.clone(), "twitter".to_string())),
            Json(EnabledRequest { enabled: true }),
        )
        .await
        .unwrap();
        let snapshot = body.data.unwrap();
        let twitter = snapshot
            .platforms
            .iter()
            .find(|p| p.platform == Platform::Twitter)
            .unwrap();
        assert!(twitter.enabled);
        assert_eq!(twitter.budget.as_ref().unwrap().targets.len(), 1);

        let Json(body) = remove_target(
            State(state.clone()),
            alice(),
            Path((id.clone(), "twitter".to_string(), "0".to_string())),
        )
        .await
        .unwrap();
        let snapshot = body.data.unwrap();
        let twitter = snapshot
            .platforms
            .iter()
            .find(|p| p.platform == Platform::Twitter)
            .unwrap();
        assert!(twitter.budget.as_ref().unwrap().targets.is_empty());

        let err = remove_target(
            State(state),
            alice(),
            Path((id, "twitter".to_string(), "5".to_string())),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "TARGET_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_disabled_platform_is_refused() {
        let (state, _dir) = licensed_state().await;
        let id = open(&state).await;

        let err = open_add(State(state), alice(), Path((id, "reddit".to_string())))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "PLATFORM_DISABLED");
    }
}

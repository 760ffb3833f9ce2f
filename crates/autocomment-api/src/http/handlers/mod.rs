//! HTTP request handlers for the REST API.
//!
//! Every session-scoped handler resolves the hosted surface for the
//! authenticated owner, applies one operation under the session lock and
//! answers with the surface's fresh snapshot.

pub mod editor;
pub mod events;
pub mod license;
pub mod platform;
pub mod session;

use uuid::Uuid;

use autocomment_types::budget::Metric;
use autocomment_types::platform::Platform;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::state::{AppState, SessionEntry};

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

pub(crate) fn parse_platform(s: &str) -> Result<Platform, AppError> {
    s.parse::<Platform>().map_err(AppError::Validation)
}

pub(crate) fn parse_metric(s: &str) -> Result<Metric, AppError> {
    s.parse::<Metric>().map_err(AppError::Validation)
}

pub(crate) fn parse_index(s: &str) -> Result<usize, AppError> {
    s.parse::<usize>()
        .map_err(|_| AppError::Validation(format!("Invalid target index: {s}")))
}

/// The caller's hosted session `id`. Sessions of other owners are reported
/// as missing.
pub(crate) fn session_entry(
    state: &AppState,
    id: &str,
    auth: &Authenticated,
) -> Result<SessionEntry, AppError> {
    let id = parse_uuid(id)?;
    state
        .hosted_session(id, &auth.owner_id)
        .ok_or(AppError::SessionNotFound(id))
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use autocomment_types::license::{License, LicenseStatus};

    use crate::http::extractors::auth::Authenticated;
    use crate::state::AppState;

    /// State over a fresh database where `alice` owns one active license.
    pub(crate) async fn licensed_state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(dir.path()).await.unwrap();
        state
            .licenses
            .upsert(
                "alice",
                &License {
                    id: "lic-1".into(),
                    key: "KEY-0001-AAAA".into(),
                    name: "Main".into(),
                    status: LicenseStatus::Active,
                },
            )
            .await
            .unwrap();
        (state, dir)
    }

    pub(crate) fn alice() -> Authenticated {
        Authenticated {
            owner_id: "alice".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_segments() {
        assert_eq!(parse_platform("reddit").unwrap(), Platform::Reddit);
        assert_eq!(parse_platform("X").unwrap(), Platform::Twitter);
        assert_eq!(parse_metric("likes").unwrap(), Metric::Likes);
        assert_eq!(parse_index("2").unwrap(), 2);

        assert_eq!(parse_platform("myspace").unwrap_err().code(), "VALIDATION_ERROR");
        assert_eq!(parse_metric("shares").unwrap_err().code(), "VALIDATION_ERROR");
        assert_eq!(parse_index("-1").unwrap_err().code(), "VALIDATION_ERROR");
        assert_eq!(parse_uuid("nope").unwrap_err().code(), "VALIDATION_ERROR");
    }
}

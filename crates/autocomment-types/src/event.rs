//! Violation notifications broadcast to session observers.
//!
//! Every refused edit produces one `ViolationEvent`. Subscribers (WebSocket
//! clients, the CLI) render it as a transient notice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::budget::Metric;
use crate::error::AllocationError;
use crate::platform::Platform;
use crate::violation::Violation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationEvent {
    pub session_id: Uuid,
    /// Machine-readable code, e.g. `CAPACITY_EXCEEDED`.
    pub code: String,
    pub platform: Option<Platform>,
    pub metric: Option<Metric>,
    pub limit: Option<u32>,
    pub attempted: Option<u32>,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl ViolationEvent {
    pub fn from_error(session_id: Uuid, err: &AllocationError) -> Self {
        let (metric, limit, attempted) = match err {
            AllocationError::CapacityExceeded {
                metric,
                available,
                attempted,
                ..
            } => (Some(*metric), Some(*available), Some(*attempted)),
            AllocationError::TargetLimitReached { limit, .. } => {
                (None, u32::try_from(*limit).ok(), None)
            }
            _ => (None, None, None),
        };
        Self {
            session_id,
            code: err.code().to_string(),
            platform: err.platform(),
            metric,
            limit,
            attempted,
            message: err.to_string(),
            at: Utc::now(),
        }
    }

    pub fn from_violation(session_id: Uuid, violation: &Violation) -> Self {
        let (metric, limit, attempted) = match violation {
            Violation::QuotaExceeded {
                metric,
                limit,
                total,
                ..
            } => (Some(*metric), Some(*limit), Some(*total)),
            _ => (None, None, None),
        };
        Self {
            session_id,
            code: violation.code().to_string(),
            platform: violation.platform(),
            metric,
            limit,
            attempted,
            message: violation.to_string(),
            at: Utc::now(),
        }
    }
}

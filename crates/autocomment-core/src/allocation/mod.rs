//! The engagement-budget allocation engine.
//!
//! - `calculator`: sums and remaining capacity (`BudgetMath`)
//! - `label`: target label rules
//! - `feed`: feed bucket controls
//! - `editor`: the add/edit target state machine
//! - `store`: per-platform aggregate operations and derived views

pub mod calculator;
pub mod editor;
pub mod feed;
pub mod label;
pub mod store;

use autocomment_types::budget::Metric;
use autocomment_types::config::QuotaPolicy;
use autocomment_types::error::AllocationError;
use autocomment_types::platform::Platform;

use calculator::floor_u32;

/// Refusal for a bucket whose ceiling is `ceiling`; everything else on the
/// platform consumes `max - ceiling`.
pub(crate) fn capacity_exceeded(
    platform: Platform,
    policy: &QuotaPolicy,
    metric: Metric,
    ceiling: i64,
    attempted: u32,
) -> AllocationError {
    let limit = policy.max(metric);
    AllocationError::CapacityExceeded {
        platform,
        metric,
        available: floor_u32(ceiling),
        attempted,
        used: floor_u32(limit as i64 - ceiling),
        limit,
    }
}

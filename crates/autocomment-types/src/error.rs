use thiserror::Error;

use crate::budget::Metric;
use crate::platform::{Platform, TargetLabelKind};
use crate::violation::Violation;

/// Typed refusal of a single editing operation.
///
/// Every variant is recoverable: the operation is rejected, prior state is
/// left untouched, and the editing session continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error(
        "{platform}: cannot allocate {attempted} {metric}, only {available} available ({used} of {limit} used elsewhere)"
    )]
    CapacityExceeded {
        platform: Platform,
        metric: Metric,
        /// Highest value the bucket may hold.
        available: u32,
        attempted: u32,
        /// Consumption by the other buckets of the platform.
        used: u32,
        limit: u32,
    },

    #[error("{platform}: you can only add up to {limit} {kind} targets per platform")]
    TargetLimitReached {
        platform: Platform,
        kind: TargetLabelKind,
        limit: usize,
    },

    #[error(
        "{platform}: all {max_likes} likes and {max_comments} comments are allocated, reduce feed or other targets first"
    )]
    PlatformSaturated {
        platform: Platform,
        max_likes: u32,
        max_comments: u32,
    },

    #[error("{platform}: invalid {kind}: {violation}")]
    InvalidLabel {
        platform: Platform,
        kind: TargetLabelKind,
        violation: LabelViolation,
    },

    #[error("a valid license is required before configuring platforms")]
    LicenseRequired,

    #[error("license '{0}' is not available")]
    LicenseUnavailable(String),

    #[error("{0} is not enabled")]
    PlatformDisabled(Platform),

    #[error("{platform}: no target at position {index}")]
    TargetNotFound { platform: Platform, index: usize },

    #[error("a target editor is already open")]
    EditorBusy,

    #[error("no target editor is open")]
    EditorClosed,

    #[error("the target draft has unsaved changes")]
    UnsavedChanges,
}

impl AllocationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AllocationError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            AllocationError::TargetLimitReached { .. } => "TARGET_LIMIT",
            AllocationError::PlatformSaturated { .. } => "PLATFORM_SATURATED",
            AllocationError::InvalidLabel { .. } => "INVALID_LABEL",
            AllocationError::LicenseRequired => "LICENSE_REQUIRED",
            AllocationError::LicenseUnavailable(_) => "LICENSE_REQUIRED",
            AllocationError::PlatformDisabled(_) => "PLATFORM_DISABLED",
            AllocationError::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            AllocationError::EditorBusy => "EDITOR_BUSY",
            AllocationError::EditorClosed => "EDITOR_CLOSED",
            AllocationError::UnsavedChanges => "UNSAVED_CHANGES",
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        match self {
            AllocationError::CapacityExceeded { platform, .. }
            | AllocationError::TargetLimitReached { platform, .. }
            | AllocationError::PlatformSaturated { platform, .. }
            | AllocationError::InvalidLabel { platform, .. }
            | AllocationError::TargetNotFound { platform, .. } => Some(*platform),
            AllocationError::PlatformDisabled(platform) => Some(*platform),
            _ => None,
        }
    }
}

/// Why a target label was refused at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelViolation {
    #[error("label cannot be empty")]
    Empty,

    #[error("only single words are allowed")]
    ContainsWhitespace,

    #[error("label cannot be just '{prefix}', add text after it")]
    BarePrefix { prefix: String },

    #[error("only letters, numbers, and underscores are allowed")]
    InvalidCharacters,

    #[error("must be at least {min} characters")]
    TooShort { min: usize },

    #[error("cannot exceed {max} characters")]
    TooLong { max: usize },
}

/// Failure of a whole-form submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("configuration rejected with {} violation(s)", .0.len())]
    Rejected(Vec<Violation>),

    #[error("failed to save configuration: {0}")]
    Persistence(String),
}

/// Failure while opening an editing session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("stored configuration is unreadable: {0}")]
    Corrupt(String),
}

/// Errors from repository operations (used by trait definitions in autocomment-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_names_numbers() {
        let err = AllocationError::CapacityExceeded {
            platform: Platform::Linkedin,
            metric: Metric::Likes,
            available: 5,
            attempted: 6,
            used: 5,
            limit: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("cannot allocate 6 likes"));
        assert!(msg.contains("only 5 available"));
        assert!(msg.contains("of 10"));
        assert_eq!(err.code(), "CAPACITY_EXCEEDED");
        assert_eq!(err.platform(), Some(Platform::Linkedin));
    }

    #[test]
    fn test_label_error_display() {
        let err = AllocationError::InvalidLabel {
            platform: Platform::Reddit,
            kind: TargetLabelKind::Subreddit,
            violation: LabelViolation::TooShort { min: 2 },
        };
        assert_eq!(
            err.to_string(),
            "REDDIT: invalid subreddit: must be at least 2 characters"
        );
    }

    #[test]
    fn test_submit_error_counts_violations() {
        let err = SubmitError::Rejected(vec![
            Violation::NoPlatformsEnabled,
            Violation::LicenseNotSelected,
        ]);
        assert_eq!(err.to_string(), "configuration rejected with 2 violation(s)");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}

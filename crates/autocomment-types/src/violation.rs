//! Whole-form validation findings.
//!
//! A `Violation` is not an error by itself: `validate_all` returns a list of
//! them and submission is refused while the list is non-empty.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::budget::Metric;
use crate::platform::Platform;

/// Minimum length of a custom prompt, in characters.
pub const MIN_CUSTOM_PROMPT_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    NoPlatformsEnabled,
    QuotaExceeded {
        platform: Platform,
        metric: Metric,
        limit: u32,
        total: u32,
    },
    TooManyTargets {
        platform: Platform,
        limit: usize,
        count: usize,
    },
    MissingCustomPrompt {
        platform: Platform,
    },
    CustomPromptTooShort {
        platform: Platform,
        min: usize,
        length: usize,
    },
    LicenseNotSelected,
}

impl Violation {
    pub fn code(&self) -> &'static str {
        match self {
            Violation::NoPlatformsEnabled => "NO_PLATFORMS_ENABLED",
            Violation::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Violation::TooManyTargets { .. } => "TOO_MANY_TARGETS",
            Violation::MissingCustomPrompt { .. } => "MISSING_CUSTOM_PROMPT",
            Violation::CustomPromptTooShort { .. } => "CUSTOM_PROMPT_TOO_SHORT",
            Violation::LicenseNotSelected => "LICENSE_NOT_SELECTED",
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        match self {
            Violation::QuotaExceeded { platform, .. }
            | Violation::TooManyTargets { platform, .. }
            | Violation::MissingCustomPrompt { platform }
            | Violation::CustomPromptTooShort { platform, .. } => Some(*platform),
            Violation::NoPlatformsEnabled | Violation::LicenseNotSelected => None,
        }
    }

    /// Quota and cardinality findings, which can arise from a policy change
    /// after the configuration was saved.
    pub fn is_drift(&self) -> bool {
        matches!(
            self,
            Violation::QuotaExceeded { .. } | Violation::TooManyTargets { .. }
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NoPlatformsEnabled => write!(f, "please enable at least one platform"),
            Violation::QuotaExceeded {
                platform,
                metric,
                limit,
                total,
            } => write!(
                f,
                "{}: total {metric} ({total}) cannot exceed {limit}",
                platform.display_name()
            ),
            Violation::TooManyTargets {
                platform,
                limit,
                count,
            } => write!(
                f,
                "{}: {count} {} targets configured, at most {limit} allowed",
                platform.display_name(),
                platform.label_kind()
            ),
            Violation::MissingCustomPrompt { platform } => write!(
                f,
                "{}: custom prompt is required when using custom mode",
                platform.display_name()
            ),
            Violation::CustomPromptTooShort {
                platform, min, ..
            } => write!(
                f,
                "{}: custom prompt must be at least {min} characters",
                platform.display_name()
            ),
            Violation::LicenseNotSelected => write!(f, "please select a license"),
        }
    }
}

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A network the auto-commenter can engage on.
///
/// Serialized in SCREAMING_SNAKE_CASE (`"LINKEDIN"`, `"TIKTOK"`) to match the
/// stored configuration documents. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Linkedin,
    Twitter,
    Facebook,
    Instagram,
    Tiktok,
    Reddit,
}

impl Platform {
    /// Every supported platform, in display order.
    pub const ALL: [Platform; 6] = [
        Platform::Linkedin,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Reddit,
    ];

    /// Human-readable name for tables and messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "Twitter/X",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
            Platform::Reddit => "Reddit",
        }
    }

    /// What a target label means on this platform.
    pub fn label_kind(&self) -> TargetLabelKind {
        match self {
            Platform::Reddit => TargetLabelKind::Subreddit,
            _ => TargetLabelKind::Keyword,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linkedin => write!(f, "LINKEDIN"),
            Platform::Twitter => write!(f, "TWITTER"),
            Platform::Facebook => write!(f, "FACEBOOK"),
            Platform::Instagram => write!(f, "INSTAGRAM"),
            Platform::Tiktok => write!(f, "TIKTOK"),
            Platform::Reddit => write!(f, "REDDIT"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" | "x" => Ok(Platform::Twitter),
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            "reddit" => Ok(Platform::Reddit),
            other => Err(format!("invalid platform: '{other}'")),
        }
    }
}

/// The flavour of label a keyword/topic target carries.
///
/// Most platforms target hashtags or plain keywords; Reddit targets
/// communities. The allocation model is identical, only label rules and
/// wording differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLabelKind {
    Keyword,
    Subreddit,
}

impl TargetLabelKind {
    /// Field name used by the dashboard for this label ("keyword" / "subreddit").
    pub fn field_name(&self) -> &'static str {
        match self {
            TargetLabelKind::Keyword => "keyword",
            TargetLabelKind::Subreddit => "subreddit",
        }
    }

    /// The prefix symbol a bare label may carry.
    pub fn prefix(&self) -> &'static str {
        match self {
            TargetLabelKind::Keyword => "#",
            TargetLabelKind::Subreddit => "r/",
        }
    }
}

impl fmt::Display for TargetLabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

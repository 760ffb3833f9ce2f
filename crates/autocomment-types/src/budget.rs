//! Engagement budget types: buckets, keyword targets, and the per-platform
//! aggregate they live in.
//!
//! The arithmetic over these types (totals, remaining capacity) lives in
//! `autocomment-core::allocation`; this module only holds data.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::platform::Platform;

/// One of the two engagement counters every bucket carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Likes,
    Comments,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Likes, Metric::Comments];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Likes => write!(f, "likes"),
            Metric::Comments => write!(f, "comments"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "likes" | "like" => Ok(Metric::Likes),
            "comments" | "comment" => Ok(Metric::Comments),
            other => Err(format!("invalid metric: '{other}'")),
        }
    }
}

/// A source of engagement consumption: the feed bucket, or one target's share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionBucket {
    pub likes: u32,
    pub comments: u32,
}

impl InteractionBucket {
    pub fn new(likes: u32, comments: u32) -> Self {
        Self { likes, comments }
    }

    pub fn get(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Likes => self.likes,
            Metric::Comments => self.comments,
        }
    }

    pub fn set(&mut self, metric: Metric, value: u32) {
        match metric {
            Metric::Likes => self.likes = value,
            Metric::Comments => self.comments = value,
        }
    }
}

/// A keyword, hashtag, or community with its own slice of the platform pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTarget {
    /// Keyword, `#hashtag`, or subreddit name depending on the platform.
    pub label: String,
    #[serde(flatten)]
    pub allocation: InteractionBucket,
}

impl KeywordTarget {
    pub fn new(label: impl Into<String>, likes: u32, comments: u32) -> Self {
        Self {
            label: label.into(),
            allocation: InteractionBucket::new(likes, comments),
        }
    }

    pub fn get(&self, metric: Metric) -> u32 {
        self.allocation.get(metric)
    }
}

/// How comments are generated for a platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    #[default]
    Automatic,
    Custom,
}

/// A user-authored prompt used in `custom` mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPrompt {
    pub id: String,
    pub title: String,
    pub text: String,
}

/// Per-platform prompt preferences. Carried through the allocator untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSettings {
    #[serde(default)]
    pub mode: PromptMode,
    /// At most one prompt is used; extra entries are preserved but ignored.
    #[serde(default)]
    pub custom_prompts: Vec<CustomPrompt>,
    #[serde(default)]
    pub selected_custom_prompt_id: Option<String>,
}

/// The per-platform aggregate: a feed bucket plus ordered keyword targets,
/// all drawing from one shared likes/comments pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBudget {
    pub platform: Platform,
    #[serde(default)]
    pub feed: InteractionBucket,
    #[serde(default)]
    pub targets: Vec<KeywordTarget>,
    #[serde(default)]
    pub prompt: PromptSettings,
}

impl PlatformBudget {
    /// A budget with nothing allocated.
    pub fn empty(platform: Platform) -> Self {
        Self {
            platform,
            feed: InteractionBucket::default(),
            targets: Vec::new(),
            prompt: PromptSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_roundtrip() {
        for metric in Metric::ALL {
            let parsed: Metric = metric.to_string().parse().unwrap();
            assert_eq!(metric, parsed);
        }
        assert_eq!("Like".parse::<Metric>().unwrap(), Metric::Likes);
    }

    #[test]
    fn test_bucket_get_set() {
        let mut bucket = InteractionBucket::new(2, 7);
        assert_eq!(bucket.get(Metric::Likes), 2);
        bucket.set(Metric::Comments, 1);
        assert_eq!(bucket, InteractionBucket::new(2, 1));
    }

    #[test]
    fn test_keyword_target_flattens_allocation() {
        let target = KeywordTarget::new("#sales", 5, 3);
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"label": "#sales", "likes": 5, "comments": 3})
        );
    }

    #[test]
    fn test_platform_budget_defaults_missing_fields() {
        let budget: PlatformBudget =
            serde_json::from_str(r#"{"platform":"TWITTER"}"#).unwrap();
        assert_eq!(budget, PlatformBudget::empty(Platform::Twitter));
        assert_eq!(budget.prompt.mode, PromptMode::Automatic);
    }
}

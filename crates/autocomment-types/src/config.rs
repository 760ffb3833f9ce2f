//! Global configuration types.
//!
//! `GlobalConfig` represents the top-level `config.toml`: the quota policy,
//! the label normalization style, and per-platform seed overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::budget::{InteractionBucket, KeywordTarget, Metric, PlatformBudget};
use crate::platform::Platform;

/// Per-platform ceilings shared by the feed bucket and every keyword target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    #[serde(default = "default_max_likes")]
    pub max_likes: u32,
    #[serde(default = "default_max_comments")]
    pub max_comments: u32,
    #[serde(default = "default_max_targets")]
    pub max_targets: usize,
}

fn default_max_likes() -> u32 {
    10
}

fn default_max_comments() -> u32 {
    10
}

fn default_max_targets() -> usize {
    3
}

impl QuotaPolicy {
    pub fn new(max_likes: u32, max_comments: u32, max_targets: usize) -> Self {
        Self {
            max_likes,
            max_comments,
            max_targets,
        }
    }

    /// Ceiling for one metric.
    pub fn max(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Likes => self.max_likes,
            Metric::Comments => self.max_comments,
        }
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::new(default_max_likes(), default_max_comments(), default_max_targets())
    }
}

/// Whether bare keywords are stored as typed or prefixed with `#`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    #[default]
    Verbatim,
    AutoHashtag,
}

/// Seed allocation for a platform that has never been configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSeed {
    #[serde(default)]
    pub feed: InteractionBucket,
    #[serde(default)]
    pub targets: Vec<KeywordTarget>,
}

impl PlatformSeed {
    pub fn new(feed: InteractionBucket, targets: Vec<KeywordTarget>) -> Self {
        Self { feed, targets }
    }

    pub fn to_budget(&self, platform: Platform) -> PlatformBudget {
        PlatformBudget {
            platform,
            feed: self.feed,
            targets: self.targets.clone(),
            prompt: Default::default(),
        }
    }
}

/// Lookup table of seed budgets keyed by platform.
///
/// Injected into the configuration surface so seeds are never scattered
/// across call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDefaults {
    seeds: BTreeMap<Platform, PlatformSeed>,
}

impl PlatformDefaults {
    /// The seeds the dashboard has always shipped with.
    pub fn builtin() -> Self {
        let seed = |feed: (u32, u32), label: &str, target: (u32, u32)| {
            PlatformSeed::new(
                InteractionBucket::new(feed.0, feed.1),
                vec![KeywordTarget::new(label, target.0, target.1)],
            )
        };

        let seeds = BTreeMap::from([
            (Platform::Linkedin, seed((5, 5), "#sales", (5, 3))),
            (Platform::Twitter, seed((3, 3), "#tech", (3, 2))),
            (Platform::Facebook, seed((4, 4), "#business", (4, 2))),
            (Platform::Instagram, seed((6, 3), "#lifestyle", (4, 2))),
            (Platform::Tiktok, seed((4, 4), "#viral", (6, 3))),
            (Platform::Reddit, seed((3, 3), "technology", (3, 2))),
        ]);

        Self { seeds }
    }

    /// A table with no seeds: every platform starts empty.
    pub fn empty() -> Self {
        Self {
            seeds: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, platform: Platform, seed: PlatformSeed) {
        self.seeds.insert(platform, seed);
    }

    pub fn get(&self, platform: Platform) -> Option<&PlatformSeed> {
        self.seeds.get(&platform)
    }

    /// Fresh budget for `platform`; empty when the table has no seed for it.
    pub fn seed_budget(&self, platform: Platform) -> PlatformBudget {
        self.seeds
            .get(&platform)
            .map(|seed| seed.to_budget(platform))
            .unwrap_or_else(|| PlatformBudget::empty(platform))
    }
}

impl Default for PlatformDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Top-level configuration, loaded from `~/.autocomment/config.toml`.
/// All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub quota: QuotaPolicy,

    #[serde(default)]
    pub label_style: LabelStyle,

    /// Seed overrides keyed by platform name (`TWITTER`, `reddit`, ...).
    /// Unknown names are ignored by the loader.
    #[serde(default)]
    pub defaults: BTreeMap<String, PlatformSeed>,
}

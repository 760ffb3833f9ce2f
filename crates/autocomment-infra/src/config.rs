//! Global configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.autocomment/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use autocomment_core::allocation::label::normalize_label;
use autocomment_core::allocation::store::BudgetStore;
use autocomment_core::surface::AllocatorSettings;
use autocomment_types::config::{GlobalConfig, PlatformDefaults, PlatformSeed};
use autocomment_types::platform::Platform;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Build the settings every editing session runs with.
///
/// `[defaults.*]` overrides are layered over the built-in seeds. A seed that
/// breaks the active quota or carries an invalid label is replaced by an
/// empty one, so a freshly seeded platform always satisfies the policy.
pub fn allocator_settings(config: &GlobalConfig) -> AllocatorSettings {
    let mut seeds = PlatformDefaults::builtin();
    for (name, seed) in &config.defaults {
        match name.parse::<Platform>() {
            Ok(platform) => seeds.set(platform, seed.clone()),
            Err(_) => tracing::warn!("Unknown platform '{name}' in [defaults], ignoring"),
        }
    }

    let mut checked = PlatformDefaults::empty();
    for platform in Platform::ALL {
        let Some(seed) = seeds.get(platform) else {
            continue;
        };
        match seed_problem(platform, seed, config) {
            None => checked.set(platform, seed.clone()),
            Some(problem) => {
                tracing::warn!("Default seed for {platform} {problem}, starting it empty");
                checked.set(platform, PlatformSeed::default());
            }
        }
    }

    AllocatorSettings {
        policy: config.quota,
        label_style: config.label_style,
        defaults: checked,
    }
}

fn seed_problem(platform: Platform, seed: &PlatformSeed, config: &GlobalConfig) -> Option<String> {
    if let Some(violation) = seed.to_budget(platform).violations(&config.quota).first() {
        return Some(format!("exceeds the quota ({violation})"));
    }
    seed.targets.iter().find_map(|target| {
        normalize_label(platform.label_kind(), config.label_style, &target.label)
            .err()
            .map(|violation| format!("has an invalid label '{}': {violation}", target.label))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocomment_types::budget::{InteractionBucket, KeywordTarget};
    use autocomment_types::config::{LabelStyle, QuotaPolicy};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.quota, QuotaPolicy::default());
        assert!(config.defaults.is_empty());
    }

    #[tokio::test]
    async fn test_load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r##"
label_style = "auto_hashtag"

[quota]
max_likes = 20
max_comments = 12
max_targets = 5

[defaults.reddit]
feed = { likes = 1, comments = 1 }
targets = [{ label = "rust", likes = 2, comments = 2 }]
"##,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.quota, QuotaPolicy::new(20, 12, 5));
        assert_eq!(config.label_style, LabelStyle::AutoHashtag);
        assert!(config.defaults.contains_key("reddit"));
    }

    #[tokio::test]
    async fn test_load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.quota, QuotaPolicy::default());
    }

    #[test]
    fn test_settings_use_builtin_seeds_by_default() {
        let settings = allocator_settings(&GlobalConfig::default());
        assert_eq!(settings.policy, QuotaPolicy::default());
        assert_eq!(settings.defaults, PlatformDefaults::builtin());
    }

    #[test]
    fn test_settings_apply_overrides_by_platform_name() {
        let mut config = GlobalConfig::default();
        config.defaults.insert(
            "Twitter".to_string(),
            PlatformSeed::new(InteractionBucket::new(1, 1), vec![]),
        );
        config
            .defaults
            .insert("myspace".to_string(), PlatformSeed::default());

        let settings = allocator_settings(&config);
        let twitter = settings.defaults.seed_budget(Platform::Twitter);
        assert_eq!(twitter.feed, InteractionBucket::new(1, 1));
        assert!(twitter.targets.is_empty());
    }

    #[test]
    fn test_seeds_over_a_tightened_quota_start_empty() {
        let config = GlobalConfig {
            quota: QuotaPolicy::new(8, 10, 3),
            ..Default::default()
        };
        let settings = allocator_settings(&config);

        // LinkedIn seeds 5 + 5 likes, over a max of 8.
        let linkedin = settings.defaults.seed_budget(Platform::Linkedin);
        assert_eq!(linkedin.feed, InteractionBucket::default());
        assert!(linkedin.targets.is_empty());

        // Twitter seeds 3 + 3 likes, still fine.
        let twitter = settings.defaults.seed_budget(Platform::Twitter);
        assert_eq!(twitter.targets[0], KeywordTarget::new("#tech", 3, 2));
    }

    #[test]
    fn test_seeds_with_invalid_labels_start_empty() {
        let mut config = GlobalConfig::default();
        config.defaults.insert(
            "REDDIT".to_string(),
            PlatformSeed::new(
                InteractionBucket::new(1, 1),
                vec![KeywordTarget::new("c++", 1, 1)],
            ),
        );
        let settings = allocator_settings(&config);
        assert!(settings.defaults.seed_budget(Platform::Reddit).targets.is_empty());
    }
}

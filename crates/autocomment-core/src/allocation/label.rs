//! Target label rules.
//!
//! Keyword labels must be a single non-empty token that is more than a bare
//! `#`. Subreddit labels additionally drop any `r/` prefix and slashes, and
//! must be 2-21 characters of letters, digits and underscores.

use autocomment_types::config::LabelStyle;
use autocomment_types::error::LabelViolation;
use autocomment_types::platform::TargetLabelKind;

pub const SUBREDDIT_MIN_LEN: usize = 2;
pub const SUBREDDIT_MAX_LEN: usize = 21;

/// Validate `raw` and return the label as it will be stored.
///
/// Rules run in a fixed order and the first failure is returned.
pub fn normalize_label(
    kind: TargetLabelKind,
    style: LabelStyle,
    raw: &str,
) -> Result<String, LabelViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LabelViolation::Empty);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(LabelViolation::ContainsWhitespace);
    }

    match kind {
        TargetLabelKind::Keyword => normalize_keyword(style, trimmed),
        TargetLabelKind::Subreddit => normalize_subreddit(trimmed),
    }
}

fn normalize_keyword(style: LabelStyle, label: &str) -> Result<String, LabelViolation> {
    let body = label.trim_start_matches('#');
    if body.is_empty() {
        return Err(LabelViolation::BarePrefix {
            prefix: TargetLabelKind::Keyword.prefix().to_string(),
        });
    }

    Ok(match style {
        LabelStyle::Verbatim => label.to_string(),
        LabelStyle::AutoHashtag => format!("#{body}"),
    })
}

fn normalize_subreddit(label: &str) -> Result<String, LabelViolation> {
    let without_prefix = label
        .strip_prefix("r/")
        .or_else(|| label.strip_prefix("R/"))
        .unwrap_or(label);
    let name: String = without_prefix.chars().filter(|c| *c != '/').collect();

    if name.is_empty() {
        return Err(LabelViolation::BarePrefix {
            prefix: TargetLabelKind::Subreddit.prefix().to_string(),
        });
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(LabelViolation::InvalidCharacters);
    }
    let len = name.chars().count();
    if len < SUBREDDIT_MIN_LEN {
        return Err(LabelViolation::TooShort {
            min: SUBREDDIT_MIN_LEN,
        });
    }
    if len > SUBREDDIT_MAX_LEN {
        return Err(LabelViolation::TooLong {
            max: SUBREDDIT_MAX_LEN,
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(raw: &str) -> Result<String, LabelViolation> {
        normalize_label(TargetLabelKind::Keyword, LabelStyle::Verbatim, raw)
    }

    fn subreddit(raw: &str) -> Result<String, LabelViolation> {
        normalize_label(TargetLabelKind::Subreddit, LabelStyle::Verbatim, raw)
    }

    #[test]
    fn test_empty_and_blank_labels_are_refused() {
        assert_eq!(keyword(""), Err(LabelViolation::Empty));
        assert_eq!(keyword("   "), Err(LabelViolation::Empty));
    }

    #[test]
    fn test_multi_word_label_is_refused() {
        assert_eq!(keyword(" two words"), Err(LabelViolation::ContainsWhitespace));
        assert_eq!(subreddit("rust lang"), Err(LabelViolation::ContainsWhitespace));
    }

    #[test]
    fn test_bare_hash_is_refused() {
        let bare = Err(LabelViolation::BarePrefix {
            prefix: "#".to_string(),
        });
        assert_eq!(keyword("#"), bare);
        assert_eq!(keyword("##"), bare);
    }

    #[test]
    fn test_verbatim_style_keeps_user_text() {
        assert_eq!(keyword("sales").unwrap(), "sales");
        assert_eq!(keyword("  #sales ").unwrap(), "#sales");
    }

    #[test]
    fn test_auto_hashtag_style_prefixes_bare_keywords() {
        let auto = |raw| normalize_label(TargetLabelKind::Keyword, LabelStyle::AutoHashtag, raw);
        assert_eq!(auto("sales").unwrap(), "#sales");
        assert_eq!(auto("#sales").unwrap(), "#sales");
        assert_eq!(auto("###sales").unwrap(), "#sales");
    }

    #[test]
    fn test_subreddit_prefix_and_slashes_are_dropped() {
        assert_eq!(subreddit("r/rust").unwrap(), "rust");
        assert_eq!(subreddit("rust/").unwrap(), "rust");
        assert_eq!(subreddit("programming_help").unwrap(), "programming_help");
    }

    #[test]
    fn test_subreddit_style_ignores_auto_hashtag() {
        let label =
            normalize_label(TargetLabelKind::Subreddit, LabelStyle::AutoHashtag, "r/rust").unwrap();
        assert_eq!(label, "rust");
    }

    #[test]
    fn test_subreddit_rules() {
        assert_eq!(
            subreddit("r/"),
            Err(LabelViolation::BarePrefix {
                prefix: "r/".to_string()
            })
        );
        assert_eq!(subreddit("c++"), Err(LabelViolation::InvalidCharacters));
        assert_eq!(subreddit("r/a"), Err(LabelViolation::TooShort { min: 2 }));
        assert_eq!(
            subreddit("abcdefghijklmnopqrstuv"),
            Err(LabelViolation::TooLong { max: 21 })
        );
        assert_eq!(subreddit("abcdefghijklmnopqrstu").unwrap().len(), 21);
    }
}

//! Query parameter extractors.

use serde::Deserialize;

/// Query parameters for closing the target editor.
#[derive(Debug, Deserialize, Default)]
pub struct DiscardQuery {
    /// Discard a draft with unsaved changes.
    #[serde(default)]
    pub confirm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_defaults_to_false() {
        let q: DiscardQuery = serde_json::from_str("{}").unwrap();
        assert!(!q.confirm);
        let q: DiscardQuery = serde_json::from_str(r#"{"confirm":true}"#).unwrap();
        assert!(q.confirm);
    }
}

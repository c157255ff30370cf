//! Render option types.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};

/// Options controlling locale, truncation and response inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderOptions {
    /// Output language.
    #[serde(default)]
    pub language: Language,
    /// Characters after which request/response content is cut.
    #[serde(default)]
    pub truncate_content: Option<usize>,
    /// Render response sections where the document kind allows them.
    #[serde(default = "default_true")]
    pub include_responses: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            truncate_content: None,
            include_responses: true,
        }
    }
}

impl RenderOptions {
    /// Create render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the content truncation length.
    pub fn with_truncate_content(mut self, limit: Option<usize>) -> Self {
        self.truncate_content = limit;
        self
    }

    /// Include or omit response sections.
    pub fn with_include_responses(mut self, include: bool) -> Self {
        self.include_responses = include;
        self
    }

    /// Load options from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.language, Language::En);
        assert_eq!(options.truncate_content, None);
        assert!(options.include_responses);
    }

    #[test]
    fn test_options_builder() {
        let options = RenderOptions::new()
            .with_language(Language::De)
            .with_truncate_content(Some(4096))
            .with_include_responses(false);

        assert_eq!(options.language, Language::De);
        assert_eq!(options.truncate_content, Some(4096));
        assert!(!options.include_responses);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = RenderOptions::from_json(r#"{"language": "fr"}"#).unwrap();
        assert_eq!(options.language, Language::Fr);
        assert!(options.include_responses);

        let json = options.to_json().unwrap();
        assert_eq!(RenderOptions::from_json(&json).unwrap(), options);
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(RenderOptions::from_json(r#"{"truncate": 4096}"#).is_err());
    }
}

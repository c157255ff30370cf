//! Translation tables and key resolution.
//!
//! Keys are two-part dotted identifiers (`context.key`). A [`Translator`]
//! resolves them against the active locale first and the English fallback
//! second; a key missing from both is an error, not a silent placeholder.

use crate::error::{ReportError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

static RE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_-]+)\}").unwrap());

/// `context → key → text`
pub type LocaleTable = HashMap<String, HashMap<String, String>>;

/// Supported output languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Fr,
}

impl Language {
    /// Locale used when a key is missing from the active one.
    pub const FALLBACK: Language = Language::En;

    pub const ALL: [Language; 3] = [Language::En, Language::De, Language::Fr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Fr => "fr",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            "fr" => Ok(Language::Fr),
            _ => Err(ReportError::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const BUNDLED_EN: &str = include_str!("../assets/i18n/en.json");
const BUNDLED_DE: &str = include_str!("../assets/i18n/de.json");
const BUNDLED_FR: &str = include_str!("../assets/i18n/fr.json");

/// All loaded locale tables. Built once at startup and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    tables: HashMap<Language, LocaleTable>,
}

impl Translations {
    /// Parse the locale tables compiled into the crate.
    pub fn bundled() -> Result<Self> {
        let mut translations = Self::default();
        for (language, json) in [
            (Language::En, BUNDLED_EN),
            (Language::De, BUNDLED_DE),
            (Language::Fr, BUNDLED_FR),
        ] {
            translations.insert(language, serde_json::from_str(json)?);
        }
        debug!(locales = translations.tables.len(), "Bundled translations loaded");
        Ok(translations)
    }

    /// Add or replace a locale table.
    pub fn insert(&mut self, language: Language, table: LocaleTable) {
        self.tables.insert(language, table);
    }

    pub fn table(&self, language: Language) -> Option<&LocaleTable> {
        self.tables.get(&language)
    }

    /// Bind a translator for `language` with the fallback locale behind it.
    pub fn translator(&self, language: Language) -> Result<Translator<'_>> {
        let primary = self
            .table(language)
            .ok_or_else(|| ReportError::UnsupportedLanguage(language.to_string()))?;
        Ok(Translator::new(primary, self.table(Language::FALLBACK)))
    }
}

/// Resolves translation keys against a primary and a fallback table.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    primary: &'a LocaleTable,
    fallback: Option<&'a LocaleTable>,
}

impl<'a> Translator<'a> {
    pub fn new(primary: &'a LocaleTable, fallback: Option<&'a LocaleTable>) -> Self {
        Self { primary, fallback }
    }

    /// Look up `context.key`.
    ///
    /// Keys without two non-empty dot-separated parts are returned unchanged.
    pub fn translate(&self, key: &str) -> Result<String> {
        let mut parts = key.split('.');
        let (Some(context), Some(name)) = (parts.next(), parts.next()) else {
            return Ok(key.to_string());
        };
        if context.is_empty() || name.is_empty() {
            return Ok(key.to_string());
        }

        let lookup = |table: &LocaleTable| table.get(context).and_then(|ctx| ctx.get(name)).cloned();

        lookup(self.primary)
            .or_else(|| self.fallback.and_then(lookup))
            .ok_or_else(|| ReportError::TranslationNotFound(key.to_string()))
    }

    /// Translate `key` and substitute `{name}` placeholders.
    ///
    /// Substitution is a single pass over the template; values are never
    /// scanned for placeholders. Unknown placeholders are left in place.
    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> Result<String> {
        let text = self.translate(key)?;
        let filled = RE_PLACEHOLDER.replace_all(&text, |caps: &Captures<'_>| {
            args.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        });
        Ok(filled.into_owned())
    }
}

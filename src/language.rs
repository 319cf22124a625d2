//! Language registry: display labels mapped to backend language codes.

use std::collections::HashSet;

use crate::error::{PolytalkError, Result};

/// One selectable language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// Plain display label, e.g. "English"
    pub label: String,
    /// Code understood by the model and speech backends, e.g. "en"
    pub code: String,
    /// Flag emoji shown in front of the label
    pub flag: String,
}

impl Language {
    pub fn new(label: &str, code: &str, flag: &str) -> Self {
        Self {
            label: label.to_string(),
            code: code.to_string(),
            flag: flag.to_string(),
        }
    }

    /// Label decorated with its flag, e.g. "🇺🇸 English"
    pub fn display_name(&self) -> String {
        if self.flag.is_empty() {
            self.label.clone()
        } else {
            format!("{} {}", self.flag, self.label)
        }
    }
}

const DEFAULT_LANGUAGES: &[(&str, &str, &str)] = &[
    ("English", "en", "🇺🇸"),
    ("Spanish", "es", "🇪🇸"),
    ("French", "fr", "🇫🇷"),
    ("German", "de", "🇩🇪"),
    ("Italian", "it", "🇮🇹"),
    ("Portuguese", "pt", "🇵🇹"),
    ("Dutch", "nl", "🇳🇱"),
    ("Russian", "ru", "🇷🇺"),
    ("Japanese", "ja", "🇯🇵"),
    ("Korean", "ko", "🇰🇷"),
    ("Chinese", "zh", "🇨🇳"),
    ("Arabic", "ar", "🇦🇪"),
    ("Hindi", "hi", "🇮🇳"),
    ("Turkish", "tr", "🇹🇷"),
    ("Swedish", "sv", "🇸🇪"),
    ("Polish", "pl", "🇵🇱"),
    ("Greek", "el", "🇬🇷"),
    ("Vietnamese", "vi", "🇻🇳"),
    ("Thai", "th", "🇹🇭"),
    ("Indonesian", "id", "🇮🇩"),
];

/// Immutable, ordered set of supported languages
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES
                .iter()
                .map(|(label, code, flag)| Language::new(label, code, flag))
                .collect(),
        }
    }
}

impl LanguageRegistry {
    /// Build a registry from a custom list; labels and codes must be unique
    pub fn from_languages(languages: Vec<Language>) -> Result<Self> {
        let mut labels = HashSet::new();
        let mut codes = HashSet::new();

        for language in &languages {
            if !labels.insert(language.label.to_lowercase()) {
                return Err(PolytalkError::Config(format!(
                    "Duplicate language label: {}",
                    language.label
                )));
            }
            if !codes.insert(language.code.clone()) {
                return Err(PolytalkError::Config(format!(
                    "Duplicate language code: {}",
                    language.code
                )));
            }
        }

        Ok(Self { languages })
    }

    /// Find a language by label; accepts the plain or flag-decorated form
    pub fn lookup(&self, label: &str) -> Result<&Language> {
        let wanted = label.trim();
        self.languages
            .iter()
            .find(|lang| {
                lang.label.eq_ignore_ascii_case(wanted)
                    || lang.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| PolytalkError::UnknownLanguage(label.to_string()))
    }

    pub fn by_code(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Label for a backend code, falling back to the code itself
    pub fn label_for_code(&self, code: &str) -> String {
        self.by_code(code)
            .map(|lang| lang.label.clone())
            .unwrap_or_else(|| code.to_string())
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

//! Core types for reconciling a family of locale documents.

use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::formats::ResxDocument;

/// Neutral value given to a key that only exists in a locale document.
pub const MISSING_NEUTRAL: &str = "MISSING";

/// Description given to a key that only exists in a locale document.
pub const MISSING_COMMENT: &str = "WARNING";

/// One localizable string with its neutral text and every known translation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceEntry {
    /// Unique identifier of the string.
    pub key: String,

    /// Description for translators, possibly empty.
    #[serde(default)]
    pub comment: String,

    /// Text of the canonical document.
    pub neutral_value: String,

    /// Map from locale code → translated text.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default)]
    pub translations: HashMap<String, String>,
}

impl ResourceEntry {
    pub fn new(
        key: impl Into<String>,
        neutral_value: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        ResourceEntry {
            key: key.into(),
            comment: comment.into(),
            neutral_value: neutral_value.into(),
            translations: HashMap::new(),
        }
    }

    /// Placeholder for a key that has a translation but no canonical text.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::new(key, MISSING_NEUTRAL, MISSING_COMMENT)
    }

    pub fn is_missing_neutral(&self) -> bool {
        self.neutral_value == MISSING_NEUTRAL && self.comment == MISSING_COMMENT
    }

    pub fn translation(&self, locale: &str) -> Option<&str> {
        self.translations.get(locale).map(String::as_str)
    }
}

impl Display for ResourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ResourceEntry {{ key: {}, neutral: {}, translations: {} }}",
            self.key,
            self.neutral_value,
            self.translations.len()
        )
    }
}

/// Non-fatal findings collected while reconciling documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A locale document defines a key the canonical document lacks.
    MissingNeutral { key: String, locale: String },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::MissingNeutral { key, locale } => write!(
                f,
                "`{}` in locale `{}` does not exist in neutral language",
                key, locale
            ),
        }
    }
}

/// The reconciled collection for one base resource name.
///
/// Every key of `ordered_keys` has an entry in `entries`; `locale_codes` holds
/// one code per merged locale document, in merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceSet {
    pub sheet_name: String,
    pub locale_codes: Vec<String>,
    pub ordered_keys: Vec<String>,
    pub entries: HashMap<String, ResourceEntry>,
}

impl ResourceSet {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        ResourceSet {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }

    /// Seeds keys and neutral values from the canonical document.
    pub fn seed(&mut self, canonical: &ResxDocument) {
        for data in &canonical.data {
            self.ordered_keys.push(data.name.clone());
            self.entries.insert(
                data.name.clone(),
                ResourceEntry::new(&data.name, &data.value, &data.comment),
            );
        }
    }

    /// Merges one locale document's values under `code`.
    ///
    /// Keys unknown to the canonical document get a [`ResourceEntry::missing`]
    /// placeholder and produce a [`Warning::MissingNeutral`].
    pub fn merge_locale(&mut self, code: &str, document: &ResxDocument) -> Vec<Warning> {
        if !self.locale_codes.iter().any(|c| c == code) {
            self.locale_codes.push(code.to_string());
        }

        let mut warnings = Vec::new();
        for data in &document.data {
            trace!(key = %data.name, locale = code, value = %data.value, "adding translation");
            self.ordered_keys.push(data.name.clone());

            let entry = self.entries.entry(data.name.clone()).or_insert_with(|| {
                warn!(key = %data.name, locale = code, "key does not exist in neutral language");
                warnings.push(Warning::MissingNeutral {
                    key: data.name.clone(),
                    locale: code.to_string(),
                });
                ResourceEntry::missing(&data.name)
            });
            entry
                .translations
                .insert(code.to_string(), data.value.clone());
        }
        warnings
    }

    /// De-duplicates the keys (first occurrence wins) and sorts them ascending.
    pub fn finalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.ordered_keys.retain(|k| seen.insert(k.clone()));
        self.ordered_keys.sort();
    }

    pub fn entry(&self, key: &str) -> Option<&ResourceEntry> {
        self.entries.get(key)
    }

    /// Iterates entries in `ordered_keys` order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.ordered_keys.iter().filter_map(|k| self.entries.get(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::DataEntry;

    fn document(pairs: &[(&str, &str)]) -> ResxDocument {
        ResxDocument::new(pairs.iter().map(|(k, v)| DataEntry::new(*k, *v)).collect())
    }

    #[test]
    fn test_seed_from_canonical() {
        let mut set = ResourceSet::new("Strings");
        let canonical = ResxDocument::new(vec![
            DataEntry::new("B", "World"),
            DataEntry::new("A", "Hello").with_comment("greeting"),
        ]);
        set.seed(&canonical);

        assert_eq!(set.ordered_keys, vec!["B", "A"]);
        let a = set.entry("A").unwrap();
        assert_eq!(a.neutral_value, "Hello");
        assert_eq!(a.comment, "greeting");
        assert!(a.translations.is_empty());
    }

    #[test]
    fn test_merge_locale_marks_missing_neutral() {
        let mut set = ResourceSet::new("Strings");
        set.seed(&document(&[("A", "Hello")]));
        let warnings = set.merge_locale("fr", &document(&[("A", "Bonjour"), ("C", "Bonus")]));

        assert_eq!(
            warnings,
            vec![Warning::MissingNeutral {
                key: "C".to_string(),
                locale: "fr".to_string()
            }]
        );
        let c = set.entry("C").unwrap();
        assert_eq!(c.neutral_value, MISSING_NEUTRAL);
        assert_eq!(c.comment, MISSING_COMMENT);
        assert!(c.is_missing_neutral());
        assert_eq!(c.translation("fr"), Some("Bonus"));
        assert_eq!(set.entry("A").unwrap().translation("fr"), Some("Bonjour"));
    }

    #[test]
    fn test_missing_key_warns_once_per_first_locale() {
        let mut set = ResourceSet::new("Strings");
        set.seed(&document(&[]));
        assert_eq!(set.merge_locale("de", &document(&[("X", "x")])).len(), 1);
        assert!(set.merge_locale("fr", &document(&[("X", "y")])).is_empty());

        let x = set.entry("X").unwrap();
        assert_eq!(x.translation("de"), Some("x"));
        assert_eq!(x.translation("fr"), Some("y"));
    }

    #[test]
    fn test_merge_locale_records_code_once() {
        let mut set = ResourceSet::new("Strings");
        set.merge_locale("fr", &document(&[]));
        set.merge_locale("de", &document(&[]));
        set.merge_locale("fr", &document(&[]));
        assert_eq!(set.locale_codes, vec!["fr", "de"]);
    }

    #[test]
    fn test_finalize_dedupes_and_sorts() {
        let mut set = ResourceSet::new("Strings");
        set.seed(&document(&[("b", "1"), ("a", "2")]));
        set.merge_locale("fr", &document(&[("c", "3"), ("a", "4"), ("b", "5")]));
        set.finalize();

        assert_eq!(set.ordered_keys, vec!["a", "b", "c"]);
        let keys: Vec<_> = set.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::MissingNeutral {
            key: "C".to_string(),
            locale: "fr".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "`C` in locale `fr` does not exist in neutral language"
        );
    }

    #[test]
    fn test_entry_display() {
        let entry = ResourceEntry::new("hello", "Hello", "");
        let display = format!("{}", entry);
        assert!(display.contains("hello"));
        assert!(display.contains("Hello"));
    }
}

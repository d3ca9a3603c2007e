//! The sheet-side view of a localization table.
//!
//! A table sheet looks like this:
//!
//! | identifier | description | neutral | fr      | de     |
//! |------------|-------------|---------|---------|--------|
//! | Greeting   | Salutation  | Hello   | Bonjour | Hallo  |
//!
//! The first two header cells are fixed; every later header cell names a
//! locale. Rows whose identifier is empty or `-` are ignored.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    formats::{DataEntry, ResxDocument, Sheet},
    types::ResourceSet,
};

pub const IDENTIFIER_HEADER: &str = "identifier";
pub const DESCRIPTION_HEADER: &str = "description";

/// Locale label of the canonical column. Its document has no locale suffix.
pub const NEUTRAL_LOCALE: &str = "neutral";

const SKIP_MARKER: &str = "-";
const FIRST_LOCALE_COLUMN: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabularModel {
    pub sheet_name: String,

    /// Distinct locale labels in the order they were first seen.
    pub locale_columns: Vec<String>,

    /// Identifiers in the order of their first row.
    pub identifiers: Vec<String>,

    /// identifier → description; the first non-empty description wins.
    pub descriptions: HashMap<String, String>,

    /// locale → identifier → text.
    pub values_by_locale: HashMap<String, HashMap<String, String>>,

    #[serde(skip)]
    known_locales: HashSet<String>,
    #[serde(skip)]
    known_identifiers: HashSet<String>,
}

impl TabularModel {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        TabularModel {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }

    /// Builds the model from a sheet whose first row is the header.
    ///
    /// Row cell `i` (for `i >= 2`) belongs to the `i - 2`-th distinct header
    /// label, so a repeated label shifts the later columns. Cells past the
    /// last distinct label are ignored.
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let mut model = Self::new(&sheet.name);
        let Some(header) = sheet.header() else {
            return model;
        };
        for label in header.iter().skip(FIRST_LOCALE_COLUMN) {
            model.add_locale(label);
        }

        for row in sheet.rows.iter().skip(1) {
            let identifier = row.first().map(String::as_str).unwrap_or("");
            if identifier.is_empty() || identifier == SKIP_MARKER {
                continue;
            }
            model.add_identifier(identifier);

            if let Some(description) = row.get(1) {
                model.set_description(identifier, description);
            }

            for (col, text) in row.iter().enumerate().skip(FIRST_LOCALE_COLUMN) {
                let Some(label) = model.locale_columns.get(col - FIRST_LOCALE_COLUMN) else {
                    break;
                };
                let label = label.clone();
                model.set_value(&label, identifier, text);
            }
        }

        model
    }

    pub fn add_locale(&mut self, label: &str) {
        if self.known_locales.insert(label.to_string()) {
            self.locale_columns.push(label.to_string());
            self.values_by_locale.entry(label.to_string()).or_default();
        }
    }

    pub fn add_identifier(&mut self, identifier: &str) {
        if self.known_identifiers.insert(identifier.to_string()) {
            self.identifiers.push(identifier.to_string());
        }
    }

    /// Records `description` unless the identifier already has one.
    pub fn set_description(&mut self, identifier: &str, description: &str) {
        if !description.is_empty() {
            self.descriptions
                .entry(identifier.to_string())
                .or_insert_with(|| description.to_string());
        }
    }

    pub fn set_value(&mut self, locale: &str, identifier: &str, text: &str) {
        self.add_locale(locale);
        self.values_by_locale
            .entry(locale.to_string())
            .or_default()
            .insert(identifier.to_string(), text.to_string());
    }

    pub fn value(&self, locale: &str, identifier: &str) -> Option<&str> {
        self.values_by_locale
            .get(locale)
            .and_then(|values| values.get(identifier))
            .map(String::as_str)
    }

    pub fn description(&self, identifier: &str) -> &str {
        self.descriptions
            .get(identifier)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Partitions the table into one document per locale column.
    ///
    /// Identifiers without text for a locale produce no entry; spaces in
    /// identifiers become underscores.
    pub fn documents(&self) -> Vec<(String, ResxDocument)> {
        self.locale_columns
            .iter()
            .map(|locale| {
                let data = self
                    .identifiers
                    .iter()
                    .filter_map(|identifier| {
                        let text = self.value(locale, identifier).filter(|t| !t.is_empty())?;
                        Some(
                            DataEntry::new(identifier.replace(' ', "_"), text)
                                .with_comment(self.description(identifier)),
                        )
                    })
                    .collect();
                (locale.clone(), ResxDocument::new(data))
            })
            .collect()
    }
}

impl From<&ResourceSet> for Sheet {
    /// Lays a reconciled set out by position: the fixed neutral column, then
    /// one column per locale code in discovery order. A locale named
    /// `neutral` still gets its own column.
    fn from(set: &ResourceSet) -> Self {
        let mut sheet = Sheet::new(&set.sheet_name);

        let mut header = vec![
            IDENTIFIER_HEADER.to_string(),
            DESCRIPTION_HEADER.to_string(),
            NEUTRAL_LOCALE.to_string(),
        ];
        header.extend(set.locale_codes.iter().cloned());
        sheet.push_row(header);

        for entry in set.iter() {
            let mut row = vec![
                entry.key.clone(),
                entry.comment.clone(),
                entry.neutral_value.clone(),
            ];
            row.extend(
                set.locale_codes
                    .iter()
                    .map(|code| entry.translation(code).unwrap_or("").to_string()),
            );
            sheet.push_row(row);
        }
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceEntry;

    fn sheet(rows: &[&[&str]]) -> Sheet {
        let mut sheet = Sheet::new("Strings");
        for row in rows {
            sheet.push_row(row.iter().copied());
        }
        sheet
    }

    #[test]
    fn test_header_defines_locale_columns() {
        let model = TabularModel::from_sheet(&sheet(&[&[
            "identifier",
            "description",
            "neutral",
            "fr",
            "neutral",
            "de",
        ]]));
        assert_eq!(model.locale_columns, vec!["neutral", "fr", "de"]);
        assert!(model.identifiers.is_empty());
    }

    #[test]
    fn test_empty_header_label_is_its_own_locale() {
        let model = TabularModel::from_sheet(&sheet(&[
            &["identifier", "description", "neutral", "", "fr"],
            &["A", "", "Hello", "blank", "Bonjour"],
        ]));
        assert_eq!(model.locale_columns, vec!["neutral", "", "fr"]);
        assert_eq!(model.value("", "A"), Some("blank"));
        assert_eq!(model.value("fr", "A"), Some("Bonjour"));
    }

    #[test]
    fn test_rows_map_positionally_to_header() {
        let model = TabularModel::from_sheet(&sheet(&[
            &["identifier", "description", "neutral", "fr"],
            &["Greeting", "Salutation", "Hello", "Bonjour"],
            &["Short", "", "Hi"],
        ]));
        assert_eq!(model.value("neutral", "Greeting"), Some("Hello"));
        assert_eq!(model.value("fr", "Greeting"), Some("Bonjour"));
        assert_eq!(model.value("neutral", "Short"), Some("Hi"));
        assert_eq!(model.value("fr", "Short"), None);
        assert_eq!(model.description("Greeting"), "Salutation");
        assert_eq!(model.description("Short"), "");
    }

    #[test]
    fn test_skip_rule_ignores_row_entirely() {
        let model = TabularModel::from_sheet(&sheet(&[
            &["identifier", "description", "neutral"],
            &["-", "Section header", "ignored"],
            &["", "No id", "ignored"],
            &["Kept", "", "value"],
        ]));
        assert_eq!(model.identifiers, vec!["Kept"]);
        assert!(model.descriptions.is_empty());
        assert_eq!(model.values_by_locale["neutral"].len(), 1);
    }

    #[test]
    fn test_first_non_empty_description_wins() {
        let model = TabularModel::from_sheet(&sheet(&[
            &["identifier", "description", "neutral"],
            &["Key", "", "one"],
            &["Key", "First", "two"],
            &["Key", "Second", "three"],
        ]));
        assert_eq!(model.identifiers, vec!["Key"]);
        assert_eq!(model.description("Key"), "First");
        assert_eq!(model.value("neutral", "Key"), Some("three"));
    }

    #[test]
    fn test_repeated_label_maps_cells_by_distinct_label_index() {
        let model = TabularModel::from_sheet(&sheet(&[
            &["identifier", "description", "fr", "fr", "de"],
            &["A", "", "x", "y", "z"],
        ]));
        assert_eq!(model.locale_columns, vec!["fr", "de"]);
        assert_eq!(model.value("fr", "A"), Some("x"));
        assert_eq!(model.value("de", "A"), Some("y"));
        // The third locale cell has no distinct label left and is dropped.
        assert_eq!(model.values_by_locale.len(), 2);
        assert_eq!(model.values_by_locale["fr"].len(), 1);
        assert_eq!(model.values_by_locale["de"].len(), 1);
    }

    #[test]
    fn test_many_rows_keep_first_appearance_order() {
        let mut rows = vec![vec![
            "identifier".to_string(),
            "description".to_string(),
            "neutral".to_string(),
        ]];
        for i in 0..30_000 {
            rows.push(vec![format!("key{}", i), String::new(), format!("v{}", i)]);
        }
        rows.push(vec!["key0".to_string(), String::new(), "again".to_string()]);
        let mut big = Sheet::new("Big");
        for row in rows {
            big.push_row(row);
        }

        let model = TabularModel::from_sheet(&big);
        assert_eq!(model.identifiers.len(), 30_000);
        assert_eq!(model.identifiers[0], "key0");
        assert_eq!(model.value("neutral", "key0"), Some("again"));
        assert_eq!(model.documents()[0].1.data.len(), 30_000);
    }

    #[test]
    fn test_documents_drop_empty_text_and_underscore_names() {
        let model = TabularModel::from_sheet(&sheet(&[
            &["identifier", "description", "neutral", "fr"],
            &["Main title", "Heading", "Welcome", ""],
            &["Ok", "", "OK", "D'accord"],
        ]));
        let documents = model.documents();
        assert_eq!(documents.len(), 2);

        let (locale, neutral) = &documents[0];
        assert_eq!(locale, "neutral");
        assert_eq!(
            neutral.data,
            vec![
                DataEntry::new("Main_title", "Welcome").with_comment("Heading"),
                DataEntry::new("Ok", "OK"),
            ]
        );

        let (locale, fr) = &documents[1];
        assert_eq!(locale, "fr");
        assert_eq!(fr.data, vec![DataEntry::new("Ok", "D'accord")]);
    }

    #[test]
    fn test_resource_set_lays_out_neutral_first() {
        let mut set = ResourceSet::new("Strings");
        set.locale_codes = vec!["se".to_string(), "fr".to_string()];
        set.ordered_keys = vec!["A".to_string(), "B".to_string()];
        let mut a = ResourceEntry::new("A", "Hello", "greeting");
        a.translations.insert("fr".to_string(), "Bonjour".to_string());
        set.entries.insert("A".to_string(), a);
        set.entries.insert("B".to_string(), ResourceEntry::new("B", "World", ""));

        let sheet = Sheet::from(&set);
        assert_eq!(sheet.name, "Strings");
        assert_eq!(
            sheet.rows,
            vec![
                vec!["identifier", "description", "neutral", "se", "fr"],
                vec!["A", "greeting", "Hello", "", "Bonjour"],
                vec!["B", "", "World"],
            ]
        );
    }

    #[test]
    fn test_neutral_locale_file_keeps_its_own_column() {
        let mut set = ResourceSet::new("Strings");
        set.locale_codes = vec!["neutral".to_string()];
        set.ordered_keys = vec!["A".to_string()];
        let mut a = ResourceEntry::new("A", "Hello", "");
        a.translations.insert("neutral".to_string(), "Other".to_string());
        set.entries.insert("A".to_string(), a);

        assert_eq!(
            Sheet::from(&set).rows,
            vec![
                vec!["identifier", "description", "neutral", "neutral"],
                vec!["A", "", "Hello", "Other"],
            ]
        );
    }
}

#![forbid(unsafe_code)]
//! Converts localization tables between `.xlsx` workbooks and `.resx`
//! resource documents.
//!
//! A workbook sheet holds one table: an `identifier` column, a `description`
//! column and one column per locale. Exporting writes one `.resx` document per
//! locale column; importing reconciles a canonical document and its locale
//! variants back into one sheet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resxsheet::{export_workbook, import_resx};
//!
//! // Workbook → Strings.resx, Strings.fr.resx, ...
//! let report = export_workbook("Translations.xlsx", "Resources")?;
//! assert!(report.is_success());
//!
//! // Strings.resx + Strings.*.resx → Translations/Strings.xlsx
//! let report = import_resx("Resources/Strings.resx", "Translations")?;
//! for warning in &report.warnings {
//!     eprintln!("{}", warning);
//! }
//! # Ok::<(), resxsheet::Error>(())
//! ```

pub mod error;
pub mod export;
pub mod formats;
pub mod import;
pub mod locator;
pub mod tabular;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    export::{ExportReport, export_workbook, render_workbook},
    formats::{DataEntry, FormatType, ResxDocument, Sheet, Workbook},
    import::{ImportReport, aggregate, import_resx},
    locator::LocaleFileLocator,
    tabular::TabularModel,
    traits::Parser,
    types::{ResourceEntry, ResourceSet, Warning},
};

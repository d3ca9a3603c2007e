//! Workbook → resource documents.
//!
//! Every worksheet of the input workbook becomes a family of `.resx` files
//! named after the sheet: `<sheet>.resx` for the neutral column and
//! `<sheet>.<locale>.resx` for every other locale column.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    error::Error,
    formats::{ResxDocument, Workbook},
    tabular::{NEUTRAL_LOCALE, TabularModel},
    traits::Parser,
};

/// One document ready to be written, with its target file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub sheet_name: String,
    pub locale: String,
    pub file_name: String,
    pub document: ResxDocument,
}

/// A file the export could not write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedWrite {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub input: PathBuf,
    pub written: Vec<PathBuf>,
    pub failed: Vec<FailedWrite>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// File name of the document for `locale` of sheet `sheet_name`.
pub fn document_file_name(sheet_name: &str, locale: &str) -> String {
    let sheet_name = sheet_name.trim_matches(' ');
    if locale == NEUTRAL_LOCALE {
        format!("{}.resx", sheet_name)
    } else {
        format!("{}.{}.resx", sheet_name, locale)
    }
}

/// Renders every sheet of `workbook` into its per-locale documents, sheet by
/// sheet and locale columns in header order.
pub fn render_workbook(workbook: &Workbook) -> Vec<RenderedDocument> {
    workbook
        .sheets
        .iter()
        .flat_map(|sheet| {
            let model = TabularModel::from_sheet(sheet);
            debug!(
                sheet = %sheet.name,
                locales = model.locale_columns.len(),
                identifiers = model.identifiers.len(),
                "parsed sheet"
            );
            model
                .documents()
                .into_iter()
                .map(move |(locale, document)| RenderedDocument {
                    file_name: document_file_name(&sheet.name, &locale),
                    sheet_name: sheet.name.clone(),
                    locale,
                    document,
                })
        })
        .collect()
}

/// Converts the workbook at `input` into `.resx` files inside `output_dir`.
///
/// An unreadable workbook fails the whole run. A file that cannot be written
/// is logged and recorded in the report while the remaining files are still
/// written.
pub fn export_workbook<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
) -> Result<ExportReport, Error> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();
    let workbook = Workbook::load(input)?;

    let mut report = ExportReport {
        input: input.to_path_buf(),
        ..Default::default()
    };

    for rendered in render_workbook(&workbook) {
        let path = output_dir.join(&rendered.file_name);
        match rendered.document.write_to(&path) {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    entries = rendered.document.data.len(),
                    "written resource file"
                );
                report.written.push(path);
            }
            Err(e) => {
                let e = Error::write_failed(&path, e);
                error!(error = %e, "error writing resource file");
                report.failed.push(FailedWrite {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

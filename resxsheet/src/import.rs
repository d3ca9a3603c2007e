//! Resource documents → workbook.
//!
//! A canonical document and all of its locale variants are reconciled into a
//! single sheet named after the canonical document. The sheet is written to
//! `<output>/<base name>.xlsx`, replacing an existing sheet of the same name.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::Error,
    formats::{ResxDocument, Sheet, Workbook},
    locator::LocaleFileLocator,
    types::{ResourceSet, Warning},
};

/// Outcome of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub output: PathBuf,
    pub sheet_name: String,
    pub locale_codes: Vec<String>,
    pub rows: usize,
    /// Whether an existing sheet of the same name was overwritten.
    pub replaced_sheet: bool,
    pub warnings: Vec<Warning>,
}

/// Reconciles a canonical document with its locale variants.
///
/// `locales` pairs each locale code with its parsed document, in discovery
/// order. The resulting key order is the sorted union of every document's keys.
pub fn aggregate(
    sheet_name: &str,
    canonical: &ResxDocument,
    locales: &[(String, ResxDocument)],
) -> (ResourceSet, Vec<Warning>) {
    let mut set = ResourceSet::new(sheet_name);
    set.seed(canonical);

    let mut warnings = Vec::new();
    for (code, document) in locales {
        warnings.extend(set.merge_locale(code, document));
    }
    set.finalize();

    (set, warnings)
}

/// Reads the canonical `.resx` at `input` plus every sibling locale file and
/// writes the reconciled table into `output_dir`.
///
/// Any unreadable document aborts the run before anything is written.
pub fn import_resx<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
) -> Result<ImportReport, Error> {
    let input = input.as_ref();
    let canonical = ResxDocument::load(input)?;

    let locator = LocaleFileLocator::new(input);
    debug!(
        base_dir = locator.base_dir(),
        base_name = locator.base_name(),
        "resolved base path"
    );

    let mut locales = Vec::new();
    for file in locator.discover()? {
        let document = ResxDocument::load(&file.path)?;
        locales.push((file.code, document));
    }

    let (set, warnings) = aggregate(locator.base_name(), &canonical, &locales);
    let sheet = Sheet::from(&set);
    let rows = sheet.rows.len().saturating_sub(1);

    let output = output_dir
        .as_ref()
        .join(format!("{}.xlsx", locator.base_name()));
    let replaced_sheet = write_sheet(&output, sheet)?;
    info!(
        path = %output.display(),
        sheet = %set.sheet_name,
        rows,
        replaced = replaced_sheet,
        "written workbook"
    );

    Ok(ImportReport {
        output,
        sheet_name: set.sheet_name,
        locale_codes: set.locale_codes,
        rows,
        replaced_sheet,
        warnings,
    })
}

/// Writes `sheet` into the workbook at `path`, creating the workbook if it does
/// not exist. Other sheets of an existing workbook are kept.
///
/// Returns `true` when a sheet with the same name was replaced.
pub fn write_sheet<P: AsRef<Path>>(path: P, sheet: Sheet) -> Result<bool, Error> {
    let path = path.as_ref();
    let mut workbook = if path.exists() {
        Workbook::load(path)?
    } else {
        Workbook::new()
    };
    let replaced = workbook.upsert_sheet(sheet);
    workbook.save(path)?;
    Ok(replaced)
}

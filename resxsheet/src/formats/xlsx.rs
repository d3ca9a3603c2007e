//! Support for `.xlsx` workbooks holding localization tables.
//!
//! Cells are read and written as plain strings. Formatting, formulas and other
//! workbook features are not preserved when a workbook is rewritten.

use std::{
    io::{BufRead, Cursor, Write},
    path::Path,
};

use calamine::{Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{DocProperties, ExcelDateTime};
use serde::Serialize;

use crate::{error::Error, traits::Parser};

/// A named worksheet as rows of cell strings.
///
/// Trailing empty cells are trimmed from every row, so rows may have
/// different lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, dropping its trailing empty cells.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(trim_row(cells.into_iter().map(Into::into).collect()));
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Returns the cell text at `(row, col)`, or `""` for a missing cell.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// An ordered collection of worksheets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Replaces the rows of the sheet with the same name, or appends the
    /// sheet when no such sheet exists. Returns `true` on replacement.
    pub fn upsert_sheet(&mut self, sheet: Sheet) -> bool {
        match self.sheets.iter_mut().find(|s| s.name == sheet.name) {
            Some(existing) => {
                existing.rows = sheet.rows;
                true
            }
            None => {
                self.sheets.push(sheet);
                false
            }
        }
    }

    /// Reads the workbook at `path`, reporting any failure as
    /// [`Error::MalformedDocument`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        Self::read_from(path).map_err(|e| Error::malformed(path, e))
    }

    /// Writes the workbook to `path`, reporting any failure as
    /// [`Error::WriteFailed`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        self.write_to(path).map_err(|e| Error::write_failed(path, e))
    }
}

impl Parser for Workbook {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let mut xlsx: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let mut workbook = Workbook::new();
        for name in xlsx.sheet_names() {
            let range = xlsx.worksheet_range(&name)?;
            workbook.sheets.push(Sheet {
                rows: range_to_rows(&range),
                name,
            });
        }
        Ok(workbook)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xlsx = rust_xlsxwriter::Workbook::new();

        // A fixed creation date keeps repeated writes byte-identical.
        let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
        xlsx.set_properties(&DocProperties::new().set_creation_datetime(&created));

        for sheet in &self.sheets {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            for (r, row) in sheet.rows.iter().enumerate() {
                let r = u32::try_from(r).map_err(|_| {
                    Error::InvalidResource(format!("too many rows in `{}`", sheet.name))
                })?;
                for (c, value) in row.iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }
                    let c = u16::try_from(c).map_err(|_| {
                        Error::InvalidResource(format!("too many columns in `{}`", sheet.name))
                    })?;
                    worksheet.write_string(r, c, value)?;
                }
            }
        }

        let buffer = xlsx.save_to_buffer()?;
        writer.write_all(&buffer)?;
        Ok(())
    }
}

fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((last_row, last_col)) = range.end() else {
        return Vec::new();
    };

    // Absolute coordinates: the range itself starts at the first used cell.
    (0..=last_row)
        .map(|r| {
            trim_row(
                (0..=last_col)
                    .map(|c| range.get_value((r, c)).map(cell_text).unwrap_or_default())
                    .collect(),
            )
        })
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn trim_row(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(String::is_empty) {
        row.pop();
    }
    row
}

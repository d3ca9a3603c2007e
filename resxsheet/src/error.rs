//! All error types for the resxsheet crate.
//!
//! These are returned from all fallible operations (discovery, parsing,
//! serialization, conversion).

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("output path not found: {}", .0.display())]
    OutputPathNotFound(PathBuf),

    #[error("malformed document `{path}`: {message}")]
    MalformedDocument { path: String, message: String },

    #[error("locale discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("failed to write `{}`: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::XlsxError),

    #[error("spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),
}

impl Error {
    /// Wraps a parse failure of the document at `path`.
    pub fn malformed(path: impl AsRef<Path>, cause: impl std::fmt::Display) -> Self {
        Error::MalformedDocument {
            path: path.as_ref().display().to_string(),
            message: cause.to_string(),
        }
    }

    /// Wraps a failure to persist the file at `path`.
    pub fn write_failed(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

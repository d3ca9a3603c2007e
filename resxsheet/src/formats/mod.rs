//! All supported file formats for resxsheet.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for telling the two sides of a conversion apart.

pub mod resx;
pub mod xlsx;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use resx::{DataEntry, Format as ResxDocument};
pub use xlsx::{Sheet, Workbook};

use crate::Error;

/// The two file formats a conversion reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Per-locale `.resx` XML resource document.
    Resx,
    /// `.xlsx` workbook holding one table per sheet.
    Xlsx,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use resxsheet::formats::FormatType;
/// assert_eq!(FormatType::Resx.to_string(), "resx");
/// assert_eq!(FormatType::Xlsx.to_string(), "xlsx");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Resx => write!(f, "resx"),
            FormatType::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// Accepts `"resx"` and `"xlsx"`, case-insensitively.
///
/// # Example
/// ```rust
/// use resxsheet::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("RESX").unwrap(), FormatType::Resx);
/// assert!(FormatType::from_str("csv").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resx" => Ok(FormatType::Resx),
            "xlsx" => Ok(FormatType::Xlsx),
            other => Err(Error::InvalidResource(format!("unknown format `{}`", other))),
        }
    }
}

impl FormatType {
    /// Returns the file extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Resx => "resx",
            FormatType::Xlsx => "xlsx",
        }
    }

    /// Infers the format from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Checks whether `path` carries this format's extension.
    pub fn matches<P: AsRef<Path>>(&self, path: P) -> bool {
        Self::from_path(path) == Some(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_type_from_str() {
        assert_eq!(FormatType::from_str("resx").unwrap(), FormatType::Resx);
        assert_eq!(FormatType::from_str("  XLSX ").unwrap(), FormatType::Xlsx);
        assert!(FormatType::from_str("").is_err());
        assert!(FormatType::from_str("xml").is_err());
    }

    #[test]
    fn test_format_type_from_path() {
        assert_eq!(
            FormatType::from_path("Resx/Strings.fr.resx"),
            Some(FormatType::Resx)
        );
        assert_eq!(FormatType::from_path("book.XLSX"), Some(FormatType::Xlsx));
        assert_eq!(FormatType::from_path("book.xls"), None);
        assert_eq!(FormatType::from_path("README"), None);
    }

    #[test]
    fn test_format_type_matches() {
        assert!(FormatType::Xlsx.matches("dir/Translations.xlsx"));
        assert!(!FormatType::Xlsx.matches("dir/Translations.xlsx.tmp"));
        assert!(!FormatType::Resx.matches("dir/Translations.xlsx"));
    }
}

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use resxsheet::FormatType;

/// Matches workbook file names, skipping the `~$name.xlsx` lock files that
/// spreadsheet applications leave next to an open workbook.
#[derive(Debug, Clone)]
pub struct WorkbookMatcher {
    include: GlobSet,
    exclude: GlobSet,
}

impl WorkbookMatcher {
    pub fn new() -> Result<Self, String> {
        Ok(WorkbookMatcher {
            include: build_set(&[&format!("*.{}", FormatType::Xlsx.extension())])?,
            exclude: build_set(&["~$*"])?,
        })
    }

    /// Matches on the file name only, so the directory part never matters.
    pub fn is_match(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = Path::new(name);
        self.include.is_match(name) && !self.exclude.is_match(name)
    }
}

fn build_set(patterns: &[&str]) -> Result<GlobSet, String> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .map_err(|e| format!("Invalid glob pattern '{}': {}", pat, e))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| format!("Failed to build glob set: {}", e))
}

/// Lists the workbooks directly inside `dir`, sorted by path.
pub fn collect_workbooks(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let matcher = WorkbookMatcher::new()?;

    // Only the directory itself; ignore files do not apply to explicit input.
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .build();

    let mut out = Vec::new();
    for dent in walker {
        let dent = dent.map_err(|e| format!("Failed to read '{}': {}", dir.display(), e))?;
        let is_file = dent.file_type().is_some_and(|t| t.is_file());
        if is_file && matcher.is_match(dent.path()) {
            out.push(dent.into_path());
        }
    }
    out.sort();
    Ok(out)
}

/// Resolves an export input: a workbook stays as is, a directory becomes the
/// workbooks inside it.
pub fn expand_export_input(input: &Path) -> Result<Vec<PathBuf>, String> {
    if input.is_dir() {
        collect_workbooks(input)
    } else {
        Ok(vec![input.to_path_buf()])
    }
}

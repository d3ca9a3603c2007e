//! Discovery of locale variants that sit next to a canonical document.
//!
//! A canonical document `dir/Strings.resx` has variants named
//! `dir/Strings.<code>.resx`, where `<code>` is the locale code.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// Splits `path` at its last `separator` into the directory part (including
/// the trailing separator, or empty) and the file name without extension.
///
/// ```rust
/// use resxsheet::locator::split_base_path;
/// assert_eq!(
///     split_base_path("./Resx/Translations.resx", '/'),
///     ("./Resx/".to_string(), "Translations".to_string())
/// );
/// ```
pub fn split_base_path(path: &str, separator: char) -> (String, String) {
    let (dir, file) = match path.rfind(separator) {
        Some(i) => path.split_at(i + separator.len_utf8()),
        None => ("", path),
    };
    let base = match file.rfind('.') {
        Some(i) if i > 0 => &file[..i],
        _ => file,
    };
    (dir.to_string(), base.to_string())
}

/// A locale variant found next to a canonical document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFile {
    pub code: String,
    pub path: PathBuf,
}

impl LocaleFile {
    /// Parses the locale code as a BCP 47 language identifier.
    pub fn language(&self) -> Option<LanguageIdentifier> {
        self.code.parse().ok()
    }
}

/// Finds the locale variants of one canonical document.
#[derive(Debug, Clone)]
pub struct LocaleFileLocator {
    base_dir: String,
    base_name: String,
    extension: String,
}

impl LocaleFileLocator {
    pub fn new<P: AsRef<Path>>(canonical: P) -> Self {
        let canonical = canonical.as_ref();
        let (base_dir, base_name) =
            split_base_path(&canonical.to_string_lossy(), MAIN_SEPARATOR);
        let extension = canonical
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        LocaleFileLocator {
            base_dir,
            base_name,
            extension,
        }
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// File name of the canonical document without its extension.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The glob pattern matching every locale variant.
    pub fn pattern(&self) -> String {
        format!(
            "{}{}.*{}",
            glob::Pattern::escape(&self.base_dir),
            glob::Pattern::escape(&self.base_name),
            glob::Pattern::escape(&self.extension)
        )
    }

    /// Derives the locale code from a variant's file name.
    pub fn locale_code<P: AsRef<Path>>(&self, candidate: P) -> Option<String> {
        let file_name = candidate.as_ref().file_name()?.to_string_lossy().into_owned();
        let code = file_name
            .strip_prefix(&format!("{}.", self.base_name))?
            .strip_suffix(&self.extension)?;
        (!code.is_empty()).then(|| code.to_string())
    }

    /// Lists the locale variants in lexicographic path order.
    pub fn discover(&self) -> Result<Vec<LocaleFile>, Error> {
        let pattern = self.pattern();
        let paths = glob::glob(&pattern).map_err(|e| Error::DiscoveryFailed(e.to_string()))?;

        let mut found = Vec::new();
        for path in paths {
            let path = path.map_err(|e| Error::DiscoveryFailed(e.to_string()))?;
            let Some(code) = self.locale_code(&path) else {
                continue;
            };
            let file = LocaleFile { code, path };
            if file.language().is_none() {
                debug!(code = %file.code, "locale code is not a BCP 47 language identifier");
            }
            debug!(path = %file.path.display(), code = %file.code, "found locale file");
            found.push(file);
        }
        Ok(found)
    }
}

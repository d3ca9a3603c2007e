use std::path::{Path, PathBuf};

use resxsheet::Error;

pub const EXIT_CONVERSION_FAILED: i32 = 1;
pub const EXIT_INPUT_NOT_FOUND: i32 = 3;
pub const EXIT_OUTPUT_NOT_FOUND: i32 = 4;

/// Expands a leading `~` or `~/` to the invoking user's home directory.
/// Any other path is returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Checks that the input exists and that the output is an existing directory.
pub fn preflight(input: &Path, output: &Path) -> Result<(), Error> {
    if !input.exists() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }
    if !output.is_dir() {
        return Err(Error::OutputPathNotFound(output.to_path_buf()));
    }
    Ok(())
}

/// Process exit code for an error that ends the run.
pub fn exit_code(error: &Error) -> i32 {
    match error {
        Error::InputNotFound(_) => EXIT_INPUT_NOT_FOUND,
        Error::OutputPathNotFound(_) => EXIT_OUTPUT_NOT_FOUND,
        _ => EXIT_CONVERSION_FAILED,
    }
}

//! Entry-point validation.

use std::fs;
use std::path::{Path, PathBuf};

use shieldgen_core::{PROJECT_EXTENSION, Result, is_project_path};
use shieldgen_error::Error;

/// Check that `path` is an existing project descriptor and return its canonical form.
///
/// Every failure is an `InvalidArgument`: this is user input, not a graph node.
pub fn validate_entry(path: &Path) -> Result<PathBuf> {
    if !is_project_path(path) {
        return Err(Error::invalid_argument(format!(
            "entry '{}' is not a .{PROJECT_EXTENSION} project descriptor",
            path.display()
        ))
        .with_operation("entry::validate")
        .with_path(path));
    }
    if !path.is_file() {
        return Err(Error::invalid_argument(format!(
            "entry project '{}' does not exist",
            path.display()
        ))
        .with_operation("entry::validate")
        .with_path(path));
    }
    fs::canonicalize(path).map_err(|err| {
        Error::invalid_argument(format!("cannot resolve entry project: {err}"))
            .with_operation("entry::validate")
            .with_path(path)
            .set_source(err)
    })
}

//! Output path resolution.

use std::path::{Path, PathBuf};

use lamekit_core::{Error, OutputDescriptor, Result};

/// Name prefix of generated output files.
const OUTPUT_PREFIX: &str = "lame-out-";

/// Resolve where the encoder should write.
///
/// An explicit `output.path` is used verbatim. Otherwise a fresh, uniquely
/// named file ending in `output.postfix` is created (empty) in `output_dir`
/// and kept, so concurrent invocations never share an output path.
///
/// # Errors
///
/// - [`Error::Validation`] if neither path nor postfix is set.
/// - [`Error::Io`] if the output file cannot be created.
pub fn resolve_output_path(output: &OutputDescriptor, output_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = output.explicit_path() {
        return Ok(path.to_path_buf());
    }

    let Some(postfix) = output.postfix() else {
        return Err(Error::validation("output.path and output.postfix not set"));
    };

    std::fs::create_dir_all(output_dir)?;
    let temp = tempfile::Builder::new()
        .prefix(OUTPUT_PREFIX)
        .suffix(postfix)
        .tempfile_in(output_dir)?;

    temp.into_temp_path()
        .keep()
        .map_err(|e| Error::from(e.error))
}

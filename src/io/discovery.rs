//! Eligible raster listing and mirrored output paths

use crate::io::error::{PipelineError, Result, WithPath};
use std::path::{Path, PathBuf};

/// List regular files at the top level of `folder` whose extension is exactly `extension`
///
/// Subdirectories are not descended into. The result is sorted so that the
/// first entry, which fixes the folder's band count, is stable across runs.
///
/// # Errors
///
/// Returns an error if the folder or one of its entries cannot be read
pub fn list_eligible_files(folder: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder).with_path(folder, "list folder")? {
        let entry = entry.with_path(folder, "read folder entry")?;
        let path = entry.path();
        let file_type = entry.file_type().with_path(&path, "inspect entry")?;
        // Symlinked rasters are followed
        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if is_file && path.extension().and_then(|s| s.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Directory receiving the normalized rasters of `folder`
pub fn output_root(folder: &Path, output_subfolder: &str) -> PathBuf {
    folder.join(output_subfolder)
}

/// Mirror `file`, relative to `source_root`, under `output_root`
///
/// # Errors
///
/// Returns an error if `file` does not live under `source_root`
pub fn mirrored_output_path(file: &Path, source_root: &Path, output_root: &Path) -> Result<PathBuf> {
    let relative = file
        .strip_prefix(source_root)
        .map_err(|_| PipelineError::FileSystem {
            path: file.to_path_buf(),
            operation: "resolve relative path",
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not inside '{}'", source_root.display()),
            ),
        })?;
    Ok(output_root.join(relative))
}

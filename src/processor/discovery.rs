//! Input discovery for batch conversion
//!
//! Resolves command-line inputs into workbook files. An input may name a
//! file, a directory (searched recursively), or a glob pattern.

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::error::{Result, SheetError};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Resolve inputs into a sorted, de-duplicated list of workbook files.
///
/// Explicitly named files are kept whatever their extension so that an
/// unsupported format is reported rather than silently skipped. Files found
/// through a directory or a pattern are kept only when supported.
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            files.extend(discover_directory(input)?);
        } else {
            files.extend(discover_pattern(input)?);
        }
    }

    files.sort();
    files.dedup();
    debug!("Discovered {} workbook files", files.len());
    Ok(files)
}

/// True when the file extension is one the loaders understand
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

fn discover_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    debug!("Searching for workbooks in: {}", dir.display());

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_supported_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn discover_pattern(input: &Path) -> Result<Vec<PathBuf>> {
    let pattern = input.to_string_lossy();
    if !pattern.contains(['*', '?', '[']) {
        return Err(SheetError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    debug!("Expanding input pattern: {}", pattern);
    let paths = glob::glob(&pattern).map_err(|e| {
        SheetError::configuration(format!("invalid input pattern '{}': {}", pattern, e))
    })?;

    let mut files = Vec::new();
    for path in paths {
        let path = path.map_err(std::io::Error::from)?;
        if path.is_file() && is_supported_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

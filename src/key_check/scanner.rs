use std::path::Path;

use anyhow::{Result, anyhow};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::key_check::{ValidationResult, validate_path};
use crate::types::error::S3kitError;

/// Validate every regular file under `root` as if its root-relative path
/// were an S3 object key.
///
/// Keys always use `/` as separator. Files are visited in file-name order so
/// the result sequence is deterministic. Entries that cannot be read are
/// logged and skipped.
///
/// # Errors
///
/// - [`S3kitError::NotFound`] if `root` does not exist
/// - [`S3kitError::NotADirectory`] if `root` is not a directory
pub fn scan_directory(root: &Path, recursive: bool) -> Result<Vec<ValidationResult>> {
    if !root.exists() {
        return Err(anyhow!(S3kitError::NotFound(format!(
            "Directory not found: {}",
            root.display()
        ))));
    }
    if !root.is_dir() {
        return Err(anyhow!(S3kitError::NotADirectory(format!(
            "Path is not a directory: {}",
            root.display()
        ))));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut results = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "failed to read directory entry.");
                continue;
            }
        };

        if !entry.path().is_file() {
            continue;
        }

        let Ok(relative_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        let key = to_object_key(relative_path);
        let path = entry.path().to_string_lossy();

        debug!(key = %key, "validating key.");
        results.push(validate_path(&key, &path));
    }

    Ok(results)
}

/// Join path components with `/` regardless of the host separator.
///
/// Non UTF-8 components are converted lossily, so undecodable bytes show up
/// as U+FFFD instead of failing the scan.
fn to_object_key(relative_path: &Path) -> String {
    relative_path
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

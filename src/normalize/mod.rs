//! Filename normalization.
//!
//! Replaces whitespace and special characters in the base name with a single
//! replacement character and renames files on disk accordingly. The extension
//! is kept verbatim.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::types::error::S3kitError;

/// Character used in place of disallowed characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Replacement {
    #[default]
    Underscore,
    Dash,
}

impl Replacement {
    pub fn as_char(&self) -> char {
        match self {
            Replacement::Underscore => '_',
            Replacement::Dash => '-',
        }
    }
}

/// Successful result of [`rename_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    AlreadyNormalized { path: PathBuf },
}

impl RenameOutcome {
    pub fn is_renamed(&self) -> bool {
        matches!(self, RenameOutcome::Renamed { .. })
    }
}

impl fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameOutcome::Renamed { from, to } => {
                write!(f, "Renamed '{}' -> '{}'", from.display(), to.display())
            }
            RenameOutcome::AlreadyNormalized { path } => {
                write!(f, "File '{}' is already normalized", path.display())
            }
        }
    }
}

/// Counts reported after a recursive run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub renamed: u64,
    pub skipped_or_failed: u64,
}

impl fmt::Display for NormalizeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} files renamed, {} errors/skipped",
            self.renamed, self.skipped_or_failed
        )
    }
}

/// Normalize a file name.
///
/// ```
/// use s3kit::normalize::{Replacement, normalize_filename};
///
/// assert_eq!(normalize_filename("my file name.txt", Replacement::Underscore), "my_file_name.txt");
/// assert_eq!(normalize_filename("my file name.txt", Replacement::Dash), "my-file-name.txt");
/// assert_eq!(normalize_filename("weird@file#name.pdf", Replacement::Underscore), "weird_file_name.pdf");
/// ```
pub fn normalize_filename(name: &str, replacement: Replacement) -> String {
    let (base, extension) = split_extension(name);
    let normalized = format!("{}{extension}", normalize_base(base, replacement));

    // A base reduced to nothing but dots turns the extension into part of a
    // dotfile name; normalize the whole name then so the result is a fixed point.
    if split_extension(&normalized).1 == extension {
        normalized
    } else {
        normalize_base(&normalized, replacement)
    }
}

/// Split `name` into base and extension. Leading dots never start an
/// extension, so `.bashrc` has none.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => name.split_at(idx),
        _ => (name, ""),
    }
}

fn normalize_base(base: &str, replacement: Replacement) -> String {
    let replacement = replacement.as_char();
    let mut normalized = String::with_capacity(base.len());
    let mut in_run = false;

    for c in base.chars() {
        let is_word = c.is_alphanumeric() || c == '_' || c == '.' || c == '-';
        if !is_word || c == '_' || c == '-' {
            if !in_run {
                normalized.push(replacement);
                in_run = true;
            }
        } else {
            normalized.push(c);
            in_run = false;
        }
    }

    normalized.trim_matches(replacement).to_string()
}

/// Rename a single file to its normalized name.
///
/// # Errors
///
/// - [`S3kitError::AlreadyExists`] if a file with the normalized name exists
/// - [`S3kitError::Io`] if the rename fails
pub fn rename_file(path: &Path, replacement: Replacement) -> Result<RenameOutcome> {
    let Some(file_name) = path.file_name() else {
        return Err(anyhow!(S3kitError::Io(format!(
            "'{}' has no file name",
            path.display()
        ))));
    };
    let file_name = file_name.to_string_lossy();
    let normalized = normalize_filename(&file_name, replacement);

    if normalized == file_name {
        return Ok(RenameOutcome::AlreadyNormalized {
            path: path.to_path_buf(),
        });
    }

    let target = path.with_file_name(&normalized);
    if target.exists() {
        return Err(anyhow!(S3kitError::AlreadyExists(format!(
            "Target file '{}' already exists",
            target.display()
        ))));
    }

    std::fs::rename(path, &target).map_err(|e| {
        anyhow!(S3kitError::Io(format!(
            "Error renaming '{}': {e}",
            path.display()
        )))
    })?;

    debug!(from = %path.display(), to = %target.display(), "file renamed.");

    Ok(RenameOutcome::Renamed {
        from: path.to_path_buf(),
        to: target,
    })
}

/// Rename every file under `root`.
///
/// The file list is collected before the first rename so renamed entries are
/// never visited twice. Each per-file result is handed to `on_outcome`;
/// failures are counted and never abort the run. Directories are not renamed.
///
/// # Errors
///
/// - [`S3kitError::NotFound`] if `root` does not exist
/// - [`S3kitError::NotADirectory`] if `root` is not a directory
pub fn normalize_directory<F>(
    root: &Path,
    replacement: Replacement,
    mut on_outcome: F,
) -> Result<NormalizeSummary>
where
    F: FnMut(&Result<RenameOutcome>),
{
    if !root.exists() {
        return Err(anyhow!(S3kitError::NotFound(format!(
            "Path '{}' does not exist",
            root.display()
        ))));
    }
    if !root.is_dir() {
        return Err(anyhow!(S3kitError::NotADirectory(format!(
            "--recursive requires a directory, but '{}' is not a directory",
            root.display()
        ))));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to read directory entry."),
        }
    }

    let mut summary = NormalizeSummary::default();
    for file in files {
        let outcome = rename_file(&file, replacement);
        match &outcome {
            Ok(renamed) if renamed.is_renamed() => summary.renamed += 1,
            _ => summary.skipped_or_failed += 1,
        }
        on_outcome(&outcome);
    }

    Ok(summary)
}

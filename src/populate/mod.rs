//! Random test data generation.
//!
//! Creates an optional random folder tree below a target directory and fills
//! it with files of random printable ASCII content.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::PopulateConfig;
use crate::types::error::S3kitError;

pub mod prompt;

const CONTENT_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \n";
const FOLDER_NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const FOLDER_NAME_MIN_LEN: usize = 3;
const FOLDER_NAME_MAX_LEN: usize = 8;

/// Progress notifications emitted while populating.
#[derive(Debug, Clone, Copy)]
pub enum PopulateEvent<'a> {
    FolderCreated(&'a Path),
    FileCreated {
        path: &'a Path,
        size: u64,
        index: u32,
        total: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFile {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateSummary {
    pub files: Vec<CreatedFile>,
    pub folders: Vec<PathBuf>,
    pub folders_requested: u32,
    pub total_bytes: u64,
}

impl fmt::Display for PopulateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generated {} files", self.files.len())?;
        if self.folders_requested > 0 {
            writeln!(f, "Created {} subfolders", self.folders.len())?;
        }
        write!(
            f,
            "Total size: {} bytes ({:.2} KB)",
            self.total_bytes,
            self.total_bytes as f64 / 1024.0
        )
    }
}

/// Check the numeric invariants of `config`.
pub fn validate_config(config: &PopulateConfig) -> Result<()> {
    if config.max_size < config.min_size {
        return Err(anyhow!(S3kitError::InvalidConfig(
            "Maximum size must be greater than or equal to minimum size".to_string()
        )));
    }
    if config.num_files < 1 {
        return Err(anyhow!(S3kitError::InvalidConfig(
            "Number of files must be at least 1".to_string()
        )));
    }
    if config.max_depth < 1 {
        return Err(anyhow!(S3kitError::InvalidConfig(
            "Maximum depth must be at least 1".to_string()
        )));
    }
    Ok(())
}

/// Generate the folder tree and files below `target_dir`.
///
/// `target_dir` is created if missing. Events are reported to `on_event` as
/// folders and files are created.
pub fn populate<R, F>(
    config: &PopulateConfig,
    target_dir: &Path,
    rng: &mut R,
    mut on_event: F,
) -> Result<PopulateSummary>
where
    R: Rng + ?Sized,
    F: FnMut(PopulateEvent<'_>),
{
    validate_config(config)?;

    fs::create_dir_all(target_dir).map_err(|e| io_error(target_dir, e))?;

    let folders = create_random_subfolders(target_dir, config.num_folders, config.max_depth, rng)?;
    for folder in &folders {
        on_event(PopulateEvent::FolderCreated(folder));
    }

    let mut candidates: Vec<&Path> = vec![target_dir];
    candidates.extend(folders.iter().map(PathBuf::as_path));

    let mut summary = PopulateSummary {
        folders_requested: config.num_folders,
        ..Default::default()
    };

    for index in 1..=config.num_files {
        let directory = if config.distribute_files && candidates.len() > 1 {
            candidates.choose(rng).copied().unwrap_or(target_dir)
        } else {
            target_dir
        };

        let created = create_random_file(directory, index, config.min_size, config.max_size, rng)?;
        on_event(PopulateEvent::FileCreated {
            path: &created.path,
            size: created.size,
            index,
            total: config.num_files,
        });

        summary.total_bytes += created.size;
        summary.files.push(created);
    }

    summary.folders = folders;
    Ok(summary)
}

/// Create up to `num_folders` random folders below `base`.
///
/// Each iteration picks a random existing folder (the base included) as
/// parent and creates a child only if the parent is shallower than
/// `max_depth`. Returns the new folders in creation order.
pub fn create_random_subfolders<R: Rng + ?Sized>(
    base: &Path,
    num_folders: u32,
    max_depth: u32,
    rng: &mut R,
) -> Result<Vec<PathBuf>> {
    let mut folders: Vec<(PathBuf, u32)> = vec![(base.to_path_buf(), 0)];

    for _ in 0..num_folders {
        let Some((parent, depth)) = folders.choose(rng).cloned() else {
            break;
        };
        if depth >= max_depth {
            continue;
        }

        let folder = parent.join(generate_folder_name(rng));
        if folders.iter().any(|(existing, _)| *existing == folder) {
            continue;
        }

        fs::create_dir_all(&folder).map_err(|e| io_error(&folder, e))?;
        debug!(folder = %folder.display(), depth = depth + 1, "folder created.");
        folders.push((folder, depth + 1));
    }

    Ok(folders.into_iter().skip(1).map(|(folder, _)| folder).collect())
}

/// Write `random_file_NNNN.txt` with a size drawn uniformly from
/// `[min_size, max_size]`.
pub fn create_random_file<R: Rng + ?Sized>(
    directory: &Path,
    index: u32,
    min_size: u64,
    max_size: u64,
    rng: &mut R,
) -> Result<CreatedFile> {
    let size = rng.gen_range(min_size..=max_size);
    let path = directory.join(format!("random_file_{index:04}.txt"));

    fs::write(&path, generate_random_content(size as usize, rng)).map_err(|e| io_error(&path, e))?;
    debug!(path = %path.display(), size = size, "file created.");

    Ok(CreatedFile { path, size })
}

pub fn generate_random_content<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<u8> {
    (0..size)
        .map(|_| CONTENT_ALPHABET[rng.gen_range(0..CONTENT_ALPHABET.len())])
        .collect()
}

pub fn generate_folder_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(FOLDER_NAME_MIN_LEN..=FOLDER_NAME_MAX_LEN);
    (0..len)
        .map(|_| FOLDER_NAME_ALPHABET[rng.gen_range(0..FOLDER_NAME_ALPHABET.len())] as char)
        .collect()
}

fn io_error(path: &Path, e: std::io::Error) -> anyhow::Error {
    anyhow!(S3kitError::Io(format!("{}: {e}", path.display())))
}

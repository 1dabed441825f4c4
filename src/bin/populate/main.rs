use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, trace};

use s3kit::config::PopulateConfig;
use s3kit::config::args::populate::PopulateArgs;
use s3kit::populate::prompt::{PromptHandler, StdioPromptHandler, confirm_current_directory};
use s3kit::populate::{PopulateEvent, PopulateSummary, populate};
use s3kit::tracing_init;
use s3kit::types::error::{S3kitError, exit_code_from_error, user_facing_message};

const PROGRESS_TEMPLATE: &str = "Progress: [{bar:40}] {pos}/{len} files";

/// populate - Generate files with random content for testing.
#[cfg_attr(coverage_nightly, coverage(off))]
fn main() {
    let config = load_config_exit_if_err();

    if let Some(shell) = config.auto_complete_shell {
        generate(
            shell,
            &mut PopulateArgs::command(),
            "populate",
            &mut std::io::stdout(),
        );

        return;
    }

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    let target_dir = match resolve_target_dir(&config, &StdioPromptHandler) {
        Ok(Some(target_dir)) => target_dir,
        Ok(None) => {
            println!("Operation aborted.");
            return;
        }
        Err(e) => exit_with_error(&e),
    };

    if let Err(e) = run(&config, &target_dir) {
        exit_with_error(&e);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn load_config_exit_if_err() -> PopulateConfig {
    match PopulateConfig::try_from(PopulateArgs::parse()) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn exit_with_error(e: &anyhow::Error) -> ! {
    eprintln!("Error: {}", user_facing_message(e));
    std::process::exit(exit_code_from_error(e));
}

fn start_tracing_if_necessary(config: &PopulateConfig) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing_init::init_tracing(tracing_config);
    true
}

/// `None` when the user declined to write into the current directory.
fn resolve_target_dir(
    config: &PopulateConfig,
    handler: &dyn PromptHandler,
) -> Result<Option<PathBuf>> {
    if let Some(target_dir) = &config.target_dir {
        return Ok(Some(target_dir.clone()));
    }

    let current_dir = std::env::current_dir()
        .map_err(|e| S3kitError::Io(e.to_string()))
        .context("failed to resolve the current directory.")?;

    if confirm_current_directory(handler, &current_dir)? {
        Ok(Some(current_dir))
    } else {
        Ok(None)
    }
}

fn run(config: &PopulateConfig, target_dir: &Path) -> Result<PopulateSummary> {
    println!(
        "Generating {} files in '{}'",
        config.num_files,
        target_dir.display()
    );
    println!(
        "File size range: {} - {} bytes",
        config.min_size, config.max_size
    );
    if config.num_folders > 0 {
        println!(
            "Creating {} subfolders with max depth {}",
            config.num_folders, config.max_depth
        );
    }

    let progress_bar = if config.verbose {
        ProgressBar::hidden()
    } else {
        let progress_bar = ProgressBar::new(u64::from(config.num_files));
        if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            progress_bar.set_style(style.progress_chars("=> "));
        }
        progress_bar
    };

    let mut rng = rand::thread_rng();
    let summary = populate(config, target_dir, &mut rng, |event| match event {
        PopulateEvent::FolderCreated(folder) if config.verbose => {
            println!("Created folder: {}", folder.display());
        }
        PopulateEvent::FileCreated { path, size, .. } if config.verbose => {
            println!("Created: {} ({size} bytes)", path.display());
        }
        PopulateEvent::FileCreated { .. } => progress_bar.inc(1),
        PopulateEvent::FolderCreated(_) => {}
    });
    progress_bar.finish();
    let summary = summary?;

    debug!(
        files = summary.files.len(),
        folders = summary.folders.len(),
        total_bytes = summary.total_bytes,
        "populate has been completed."
    );

    println!("\n{summary}");

    Ok(summary)
}

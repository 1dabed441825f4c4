use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::trace;

use s3kit::config::NormalizeConfig;
use s3kit::config::args::normalize::NormalizeArgs;
use s3kit::normalize::{normalize_directory, rename_file};
use s3kit::tracing_init;
use s3kit::types::error::{S3kitError, exit_code_from_error, user_facing_message};

/// filenormie - Normalize file names into a predictable, shell-friendly form.
#[cfg_attr(coverage_nightly, coverage(off))]
fn main() {
    let config = load_config_exit_if_err();

    if let Some(shell) = config.auto_complete_shell {
        generate(
            shell,
            &mut NormalizeArgs::command(),
            "filenormie",
            &mut std::io::stdout(),
        );

        return;
    }

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", user_facing_message(&e));
        std::process::exit(exit_code_from_error(&e));
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn load_config_exit_if_err() -> NormalizeConfig {
    match NormalizeConfig::try_from(NormalizeArgs::parse()) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

fn start_tracing_if_necessary(config: &NormalizeConfig) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing_init::init_tracing(tracing_config);
    true
}

fn run(config: &NormalizeConfig) -> Result<()> {
    if config.recursive {
        let summary = normalize_directory(&config.path, config.replacement, |outcome| {
            match outcome {
                Ok(outcome) => println!("{outcome}"),
                Err(e) => println!("Error: {}", user_facing_message(e)),
            }
        })?;
        println!("\n{summary}");
        return Ok(());
    }

    if !config.path.exists() {
        return Err(anyhow!(S3kitError::NotFound(format!(
            "Path '{}' does not exist",
            config.path.display()
        ))));
    }
    if config.path.is_dir() {
        return Err(anyhow!(S3kitError::InvalidConfig(format!(
            "'{}' is a directory. Use --recursive to process directories",
            config.path.display()
        ))));
    }

    let outcome = rename_file(&config.path, config.replacement)?;
    println!("{outcome}");

    Ok(())
}

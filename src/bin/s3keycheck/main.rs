use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, trace};

use s3kit::config::KeyCheckConfig;
use s3kit::config::args::key_check::KeyCheckArgs;
use s3kit::key_check::{ReportSummary, generate_json, generate_report, scan_directory};
use s3kit::tracing_init;
use s3kit::types::error::{S3kitError, exit_code_from_error, user_facing_message};

/// s3keycheck - Check local file paths for S3 object key compatibility.
///
/// Exits with 1 when at least one key is invalid.
#[cfg_attr(coverage_nightly, coverage(off))]
fn main() {
    let config = load_config_exit_if_err();

    if let Some(shell) = config.auto_complete_shell {
        generate(
            shell,
            &mut KeyCheckArgs::command(),
            "s3keycheck",
            &mut std::io::stdout(),
        );

        return;
    }

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    match run(&config) {
        Ok(summary) if summary.has_invalid() => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", user_facing_message(&e));
            std::process::exit(exit_code_from_error(&e));
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn load_config_exit_if_err() -> KeyCheckConfig {
    match KeyCheckConfig::try_from(KeyCheckArgs::parse()) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

fn start_tracing_if_necessary(config: &KeyCheckConfig) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing_init::init_tracing(tracing_config);
    true
}

fn scan_banner(config: &KeyCheckConfig) -> String {
    format!(
        "Scanning {}: {}",
        if config.recursive {
            "recursively"
        } else {
            "non-recursively"
        },
        config.directory.display()
    )
}

/// JSON printed on stdout must be the only thing there.
fn banner_to_stderr(config: &KeyCheckConfig) -> bool {
    config.json && config.output_file.is_none()
}

fn run(config: &KeyCheckConfig) -> Result<ReportSummary> {
    if banner_to_stderr(config) {
        eprintln!("{}", scan_banner(config));
    } else {
        println!("{}", scan_banner(config));
    }

    let results = scan_directory(&config.directory, config.recursive)?;
    let summary = ReportSummary::from_results(&results);
    debug!(
        total = summary.total,
        invalid = summary.invalid,
        with_warnings = summary.with_warnings,
        "key check has been completed."
    );

    let output = if config.json {
        generate_json(&results)?
    } else {
        generate_report(&results, config.show_valid)
    };

    match &config.output_file {
        Some(path) => {
            std::fs::write(path, output)
                .map_err(|e| S3kitError::Io(format!("{}: {e}", path.display())))
                .context("failed to write the report.")?;
            println!("Report written to: {}", path.display());
        }
        None => println!("{output}"),
    }

    Ok(summary)
}

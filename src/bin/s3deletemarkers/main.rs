use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::trace;

use s3kit::config::DeleteMarkersConfig;
use s3kit::config::args::delete_markers::DeleteMarkersArgs;
use s3kit::delete_markers::{DeleteMarkerLister, format_table, no_delete_markers_message};
use s3kit::storage::create_storage;
use s3kit::tracing_init;
use s3kit::types::error::{exit_code_from_error, user_facing_message};

/// s3deletemarkers - List the delete markers of a versioned S3 bucket.
#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let config = load_config_exit_if_err();

    if let Some(shell) = config.auto_complete_shell {
        generate(
            shell,
            &mut DeleteMarkersArgs::command(),
            "s3deletemarkers",
            &mut std::io::stdout(),
        );

        return;
    }

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    if let Err(e) = run(config).await {
        eprintln!("Error: {}", user_facing_message(&e));
        std::process::exit(exit_code_from_error(&e));
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn load_config_exit_if_err() -> DeleteMarkersConfig {
    match DeleteMarkersConfig::try_from(DeleteMarkersArgs::parse()) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

fn start_tracing_if_necessary(config: &DeleteMarkersConfig) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing_init::init_tracing(tracing_config);
    true
}

#[cfg_attr(coverage_nightly, coverage(off))]
async fn run(config: DeleteMarkersConfig) -> Result<()> {
    let storage = create_storage(&config.bucket, config.client_config.clone()).await;
    let rows = DeleteMarkerLister::new(storage, config.max_keys)
        .list()
        .await?;

    if rows.is_empty() {
        println!("{}", no_delete_markers_message(&config.bucket));
        return Ok(());
    }

    println!(
        "Found {} delete markers in bucket '{}':\n",
        rows.len(),
        config.bucket
    );
    println!("{}", format_table(&rows));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_fork::rusty_fork_test;
    use s3kit::config::args::delete_markers::parse_from_args;

    rusty_fork_test! {
        #[test]
        fn with_tracing() {
            let args = vec!["s3deletemarkers", "-v", "versioned-bucket"];

            let config = DeleteMarkersConfig::try_from(parse_from_args(args).unwrap()).unwrap();
            assert!(start_tracing_if_necessary(&config));
        }

        #[test]
        fn without_tracing() {
            let args = vec!["s3deletemarkers", "-qq", "versioned-bucket"];

            let config = DeleteMarkersConfig::try_from(parse_from_args(args).unwrap()).unwrap();
            assert!(!start_tracing_if_necessary(&config));
        }
    }
}

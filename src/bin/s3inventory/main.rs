use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, trace};

use s3kit::config::InventoryConfig;
use s3kit::config::args::inventory::InventoryArgs;
use s3kit::inventory::{InventoryLister, dump_inventory};
use s3kit::storage::create_storage;
use s3kit::tracing_init;
use s3kit::types::error::{exit_code_from_error, user_facing_message};

const ROW_CHANNEL_CAPACITY: usize = 1000;

/// s3inventory - Write the object inventory of an S3 bucket to a CSV file.
///
/// The bucket is probed before the output file is created. Listing and CSV
/// writing then run as two tasks connected by a bounded channel.
#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let config = load_config_exit_if_err();

    if let Some(shell) = config.auto_complete_shell {
        generate(
            shell,
            &mut InventoryArgs::command(),
            "s3inventory",
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
fn load_config_exit_if_err() -> InventoryConfig {
    match InventoryConfig::try_from(InventoryArgs::parse()) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

fn start_tracing_if_necessary(config: &InventoryConfig) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing_init::init_tracing(tracing_config);
    true
}

#[cfg_attr(coverage_nightly, coverage(off))]
async fn run(config: InventoryConfig) -> Result<()> {
    println!("Starting inventory dump for bucket: {}", config.bucket);

    let start_time = tokio::time::Instant::now();
    let storage = create_storage(&config.bucket, config.client_config.clone()).await;
    let lister = InventoryLister::new(storage, config.filter_config.clone(), config.max_keys);

    let written = dump_inventory(
        &lister,
        &config.output_file,
        ROW_CHANNEL_CAPACITY,
        |emitted| println!("Processed {emitted} objects..."),
    )
    .await?;

    debug!(
        written = written,
        duration_sec = format!("{:.3}", start_time.elapsed().as_secs_f32()),
        "s3inventory has been completed."
    );

    println!("Inventory dump completed. Total objects: {written}");
    println!("Output saved to: {}", config.output_file.display());

    Ok(())
}

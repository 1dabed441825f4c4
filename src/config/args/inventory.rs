use crate::config::args::{AwsArgs, DEFAULT_MAX_KEYS, LoggingArgs, check_max_keys};
use crate::config::{FilterConfig, InventoryConfig, default_inventory_output};
use clap::Parser;
use clap::builder::{ArgPredicate, NonEmptyStringValueParser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Write the object inventory of an S3 bucket to a CSV file.
#[derive(Parser, Clone, Debug)]
#[command(name = "s3inventory", version, about, long_about = None)]
pub struct InventoryArgs {
    /// Name of the bucket.
    #[arg(
        value_parser = NonEmptyStringValueParser::new(),
        default_value_if("auto_complete_shell", ArgPredicate::IsPresent, "ignored"),
        required = false
    )]
    pub bucket: String,

    /// Output CSV file. Default: <BUCKET>_inventory.csv
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Directory prefix to exclude, e.g. "logs".
    #[arg(long, value_parser = NonEmptyStringValueParser::new(), help_heading = "Filtering")]
    pub exclude_dir: Option<String>,

    /// Comma-separated key prefixes to exclude.
    #[arg(long, env, value_delimiter = ',', help_heading = "Filtering")]
    pub exclude_prefixes: Vec<String>,

    /// Comma-separated file extensions to exclude, e.g. "jpg,png".
    #[arg(long, env, value_delimiter = ',', help_heading = "Filtering")]
    pub exclude_extensions: Vec<String>,

    #[command(flatten)]
    pub aws: AwsArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Max keys per listing request.
    #[arg(long, env, default_value_t = DEFAULT_MAX_KEYS, value_parser = check_max_keys, help_heading = "Advanced")]
    pub max_keys: i32,

    /// Generate shell completions.
    #[arg(long, env, help_heading = "Advanced")]
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

pub fn parse_from_args<I, T>(args: I) -> Result<InventoryArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    InventoryArgs::try_parse_from(args)
}

impl TryFrom<InventoryArgs> for InventoryConfig {
    type Error = String;

    fn try_from(args: InventoryArgs) -> Result<Self, Self::Error> {
        args.aws.validate()?;

        let prefixes = args.exclude_dir.iter().chain(args.exclude_prefixes.iter());
        let filter_config = FilterConfig::new(prefixes, &args.exclude_extensions);
        let output_file = args
            .output
            .unwrap_or_else(|| default_inventory_output(&args.bucket));

        Ok(InventoryConfig {
            client_config: Some(args.aws.build_client_config()),
            bucket: args.bucket,
            output_file,
            filter_config,
            max_keys: args.max_keys,
            tracing_config: args.logging.build_tracing_config(),
            auto_complete_shell: args.auto_complete_shell,
        })
    }
}

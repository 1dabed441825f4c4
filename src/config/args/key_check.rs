use crate::config::KeyCheckConfig;
use crate::config::args::LoggingArgs;
use clap::Parser;
use clap::builder::ArgPredicate;
use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_NO_RECURSIVE: bool = false;
const DEFAULT_SHOW_VALID: bool = false;
const DEFAULT_JSON: bool = false;

/// Check local file paths for S3 object key compatibility.
#[derive(Parser, Clone, Debug)]
#[command(name = "s3keycheck", version, about, long_about = None)]
pub struct KeyCheckArgs {
    /// Directory to scan.
    #[arg(
        default_value_if("auto_complete_shell", ArgPredicate::IsPresent, "ignored"),
        required = false
    )]
    pub directory: PathBuf,

    /// Only scan the top level of the directory.
    #[arg(long, default_value_t = DEFAULT_NO_RECURSIVE)]
    pub no_recursive: bool,

    /// Include valid files in the report.
    #[arg(long, default_value_t = DEFAULT_SHOW_VALID)]
    pub show_valid: bool,

    /// Write the report to this file instead of stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output the results as JSON.
    #[arg(long, default_value_t = DEFAULT_JSON)]
    pub json: bool,

    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Generate shell completions.
    #[arg(long, env, help_heading = "Advanced")]
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

pub fn parse_from_args<I, T>(args: I) -> Result<KeyCheckArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    KeyCheckArgs::try_parse_from(args)
}

impl TryFrom<KeyCheckArgs> for KeyCheckConfig {
    type Error = String;

    fn try_from(args: KeyCheckArgs) -> Result<Self, Self::Error> {
        let tracing_config = args.logging.build_tracing_config();

        Ok(KeyCheckConfig {
            directory: args.directory,
            recursive: !args.no_recursive,
            show_valid: args.show_valid,
            output_file: args.output,
            json: args.json,
            tracing_config,
            auto_complete_shell: args.auto_complete_shell,
        })
    }
}

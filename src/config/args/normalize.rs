use crate::config::NormalizeConfig;
use crate::config::args::LoggingArgs;
use crate::normalize::Replacement;
use clap::Parser;
use clap::builder::ArgPredicate;
use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_DASHES: bool = false;
const DEFAULT_RECURSIVE: bool = false;

/// Normalize file names into a predictable, shell-friendly form.
#[derive(Parser, Clone, Debug)]
#[command(name = "filenormie", version, about, long_about = None)]
pub struct NormalizeArgs {
    /// File to rename, or directory with --recursive.
    #[arg(
        default_value_if("auto_complete_shell", ArgPredicate::IsPresent, "ignored"),
        required = false
    )]
    pub path: PathBuf,

    /// Use dashes instead of underscores as the separator.
    #[arg(short = 'd', long, default_value_t = DEFAULT_DASHES)]
    pub dashes: bool,

    /// Rename every file below the directory.
    #[arg(short = 'r', long, default_value_t = DEFAULT_RECURSIVE)]
    pub recursive: bool,

    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Generate shell completions.
    #[arg(long, env, help_heading = "Advanced")]
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

pub fn parse_from_args<I, T>(args: I) -> Result<NormalizeArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    NormalizeArgs::try_parse_from(args)
}

impl TryFrom<NormalizeArgs> for NormalizeConfig {
    type Error = String;

    fn try_from(args: NormalizeArgs) -> Result<Self, Self::Error> {
        let replacement = if args.dashes {
            Replacement::Dash
        } else {
            Replacement::Underscore
        };

        Ok(NormalizeConfig {
            path: args.path,
            replacement,
            recursive: args.recursive,
            tracing_config: args.logging.build_tracing_config(),
            auto_complete_shell: args.auto_complete_shell,
        })
    }
}

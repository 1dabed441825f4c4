use crate::config::PopulateConfig;
use crate::config::args::{LoggingArgs, check_human_bytes, parse_human_bytes};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_NUM_FILES: u32 = 10;
const DEFAULT_MIN_SIZE: &str = "100";
const DEFAULT_MAX_SIZE: &str = "10000";
const DEFAULT_NUM_FOLDERS: u32 = 0;
const DEFAULT_MAX_DEPTH: u32 = 3;
const DEFAULT_DISTRIBUTE_FILES: bool = false;
const DEFAULT_VERBOSE_FILES: bool = false;

const ERROR_MESSAGE_MAX_SIZE_LESS_THAN_MIN_SIZE: &str =
    "Maximum size must be greater than or equal to minimum size";
const ERROR_MESSAGE_NUM_FILES_ZERO: &str = "Number of files must be at least 1";
const ERROR_MESSAGE_MAX_DEPTH_ZERO: &str = "Maximum depth must be at least 1";

/// Generate files with random content for testing.
#[derive(Parser, Clone, Debug)]
#[command(name = "populate", version, about, long_about = None)]
pub struct PopulateArgs {
    /// Directory to create the files in. Default: current directory (asks first).
    pub target_dir: Option<PathBuf>,

    /// Number of files to generate.
    #[arg(short = 'n', long, env, default_value_t = DEFAULT_NUM_FILES)]
    pub num_files: u32,

    /// Minimum file size. Allow suffixes: KB, KiB, MB, MiB.
    #[arg(long, env, default_value = DEFAULT_MIN_SIZE, value_parser = check_human_bytes)]
    pub min_size: String,

    /// Maximum file size. Allow suffixes: KB, KiB, MB, MiB.
    #[arg(long, env, default_value = DEFAULT_MAX_SIZE, value_parser = check_human_bytes)]
    pub max_size: String,

    /// Number of random subfolders to create.
    #[arg(long, env, default_value_t = DEFAULT_NUM_FOLDERS, help_heading = "Folders")]
    pub num_folders: u32,

    /// Maximum depth of the subfolder tree.
    #[arg(long, env, default_value_t = DEFAULT_MAX_DEPTH, help_heading = "Folders")]
    pub max_depth: u32,

    /// Place files in random subfolders instead of the target directory.
    #[arg(long, env, default_value_t = DEFAULT_DISTRIBUTE_FILES, help_heading = "Folders")]
    pub distribute_files: bool,

    /// Print every created file and folder instead of a progress bar.
    #[arg(long, env, default_value_t = DEFAULT_VERBOSE_FILES)]
    pub verbose_files: bool,

    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Generate shell completions.
    #[arg(long, env, help_heading = "Advanced")]
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

impl PopulateArgs {
    fn validate(&self, min_size: u64, max_size: u64) -> Result<(), String> {
        if max_size < min_size {
            return Err(ERROR_MESSAGE_MAX_SIZE_LESS_THAN_MIN_SIZE.to_string());
        }
        if self.num_files < 1 {
            return Err(ERROR_MESSAGE_NUM_FILES_ZERO.to_string());
        }
        if self.max_depth < 1 {
            return Err(ERROR_MESSAGE_MAX_DEPTH_ZERO.to_string());
        }
        Ok(())
    }
}

pub fn parse_from_args<I, T>(args: I) -> Result<PopulateArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    PopulateArgs::try_parse_from(args)
}

impl TryFrom<PopulateArgs> for PopulateConfig {
    type Error = String;

    fn try_from(args: PopulateArgs) -> Result<Self, Self::Error> {
        let min_size = parse_human_bytes(&args.min_size)?;
        let max_size = parse_human_bytes(&args.max_size)?;
        args.validate(min_size, max_size)?;

        Ok(PopulateConfig {
            target_dir: args.target_dir,
            num_files: args.num_files,
            min_size,
            max_size,
            num_folders: args.num_folders,
            max_depth: args.max_depth,
            distribute_files: args.distribute_files,
            verbose: args.verbose_files,
            tracing_config: args.logging.build_tracing_config(),
            auto_complete_shell: args.auto_complete_shell,
        })
    }
}

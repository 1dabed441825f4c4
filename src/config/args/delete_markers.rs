use crate::config::DeleteMarkersConfig;
use crate::config::args::{AwsArgs, DEFAULT_MAX_KEYS, LoggingArgs, check_max_keys};
use clap::Parser;
use clap::builder::{ArgPredicate, NonEmptyStringValueParser};
use std::ffi::OsString;

/// List the delete markers of a versioned S3 bucket.
#[derive(Parser, Clone, Debug)]
#[command(name = "s3deletemarkers", version, about, long_about = None)]
pub struct DeleteMarkersArgs {
    /// Name of the bucket.
    #[arg(
        value_parser = NonEmptyStringValueParser::new(),
        default_value_if("auto_complete_shell", ArgPredicate::IsPresent, "ignored"),
        required = false
    )]
    pub bucket: String,

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

pub fn parse_from_args<I, T>(args: I) -> Result<DeleteMarkersArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    DeleteMarkersArgs::try_parse_from(args)
}

impl TryFrom<DeleteMarkersArgs> for DeleteMarkersConfig {
    type Error = String;

    fn try_from(args: DeleteMarkersArgs) -> Result<Self, Self::Error> {
        args.aws.validate()?;

        Ok(DeleteMarkersConfig {
            bucket: args.bucket,
            client_config: Some(args.aws.build_client_config()),
            max_keys: args.max_keys,
            tracing_config: args.logging.build_tracing_config(),
            auto_complete_shell: args.auto_complete_shell,
        })
    }
}

pub mod args;

use std::path::PathBuf;

use crate::normalize::Replacement;
use crate::types::{ClientConfigLocation, S3Credentials};

/// Largest page the S3 listing APIs return per request.
pub const MAX_KEYS_LIMIT: i32 = 1000;

/// Configuration for the bucket inventory dump (`s3inventory`).
///
/// # Quick Start
///
/// ```
/// use s3kit::config::InventoryConfig;
///
/// let config = InventoryConfig::for_bucket("my-bucket");
/// assert_eq!(config.max_keys, 1000);
/// assert_eq!(config.output_file.to_str(), Some("my-bucket_inventory.csv"));
/// ```
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub bucket: String,
    pub output_file: PathBuf,
    pub client_config: Option<ClientConfig>,
    pub filter_config: FilterConfig,
    pub max_keys: i32,
    pub tracing_config: Option<TracingConfig>,
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

impl InventoryConfig {
    pub fn for_bucket(bucket: &str) -> Self {
        InventoryConfig {
            bucket: bucket.to_string(),
            output_file: default_inventory_output(bucket),
            client_config: None,
            filter_config: FilterConfig::default(),
            max_keys: MAX_KEYS_LIMIT,
            tracing_config: None,
            auto_complete_shell: None,
        }
    }
}

/// `<bucket>_inventory.csv`
pub fn default_inventory_output(bucket: &str) -> PathBuf {
    PathBuf::from(format!("{bucket}_inventory.csv"))
}

/// Configuration for the delete marker listing (`s3deletemarkers`).
#[derive(Debug, Clone)]
pub struct DeleteMarkersConfig {
    pub bucket: String,
    pub client_config: Option<ClientConfig>,
    pub max_keys: i32,
    pub tracing_config: Option<TracingConfig>,
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

impl DeleteMarkersConfig {
    pub fn for_bucket(bucket: &str) -> Self {
        DeleteMarkersConfig {
            bucket: bucket.to_string(),
            client_config: None,
            max_keys: MAX_KEYS_LIMIT,
            tracing_config: None,
            auto_complete_shell: None,
        }
    }
}

/// Configuration for the key validator (`s3keycheck`).
#[derive(Debug, Clone)]
pub struct KeyCheckConfig {
    pub directory: PathBuf,
    pub recursive: bool,
    pub show_valid: bool,
    pub output_file: Option<PathBuf>,
    pub json: bool,
    pub tracing_config: Option<TracingConfig>,
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

/// Configuration for the filename normalizer (`filenormie`).
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub path: PathBuf,
    pub replacement: Replacement,
    pub recursive: bool,
    pub tracing_config: Option<TracingConfig>,
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

/// Configuration for the random file generator (`populate`).
///
/// `target_dir` is `None` when no directory was given on the command line;
/// the binary then asks before writing into the current directory.
#[derive(Debug, Clone)]
pub struct PopulateConfig {
    pub target_dir: Option<PathBuf>,
    pub num_files: u32,
    pub min_size: u64,
    pub max_size: u64,
    pub num_folders: u32,
    pub max_depth: u32,
    pub distribute_files: bool,
    pub verbose: bool,
    pub tracing_config: Option<TracingConfig>,
    pub auto_complete_shell: Option<clap_complete::shells::Shell>,
}

impl Default for PopulateConfig {
    fn default() -> Self {
        PopulateConfig {
            target_dir: None,
            num_files: 10,
            min_size: 100,
            max_size: 10_000,
            num_folders: 0,
            max_depth: 3,
            distribute_files: false,
            verbose: false,
            tracing_config: None,
            auto_complete_shell: None,
        }
    }
}

/// AWS S3 client configuration.
///
/// Credential loading, region, endpoint, retry and timeout settings used by
/// [`ClientConfig::create_client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_config_location: ClientConfigLocation,
    pub credential: S3Credentials,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub retry_config: RetryConfig,
    pub cli_timeout_config: CLITimeoutConfig,
    pub disable_stalled_stream_protection: bool,
}

/// Retry configuration for AWS SDK operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub aws_max_attempts: u32,
    pub initial_backoff_milliseconds: u64,
}

/// Timeout configuration for AWS SDK operations.
#[derive(Debug, Clone)]
pub struct CLITimeoutConfig {
    pub operation_timeout_milliseconds: Option<u64>,
    pub operation_attempt_timeout_milliseconds: Option<u64>,
    pub connect_timeout_milliseconds: Option<u64>,
    pub read_timeout_milliseconds: Option<u64>,
}

/// Tracing (logging) configuration.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    pub tracing_level: log::Level,
    pub json_tracing: bool,
    pub aws_sdk_tracing: bool,
    pub span_events_tracing: bool,
    pub disable_color_tracing: bool,
}

/// Exclusion rules applied to every listed object before it is emitted.
///
/// Prefixes are normalized to end with `/` and extensions to start with `.`
/// in lower case. Empty entries are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    pub excluded_prefixes: Vec<String>,
    pub excluded_extensions: Vec<String>,
}

impl FilterConfig {
    pub fn new<P, E>(prefixes: P, extensions: E) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let mut excluded_prefixes: Vec<String> = Vec::new();
        for prefix in prefixes {
            if let Some(prefix) = normalize_prefix(prefix.as_ref()) {
                if !excluded_prefixes.contains(&prefix) {
                    excluded_prefixes.push(prefix);
                }
            }
        }

        let mut excluded_extensions: Vec<String> = Vec::new();
        for extension in extensions {
            if let Some(extension) = normalize_extension(extension.as_ref()) {
                if !excluded_extensions.contains(&extension) {
                    excluded_extensions.push(extension);
                }
            }
        }

        FilterConfig {
            excluded_prefixes,
            excluded_extensions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.excluded_prefixes.is_empty() && self.excluded_extensions.is_empty()
    }
}

fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("{trimmed}/"))
}

fn normalize_extension(extension: &str) -> Option<String> {
    let trimmed = extension.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

use std::time::Duration;

use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_config::retry::RetryConfig;
use aws_config::stalled_stream_protection::StalledStreamProtectionConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, ConfigLoader, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;

use crate::config::ClientConfig;
use crate::types::S3Credentials;

const CREDENTIALS_PROVIDER_NAME: &str = "s3kit";

impl ClientConfig {
    /// Build an S3 client from this configuration.
    ///
    /// No request is sent; credentials are resolved lazily on first use.
    pub async fn create_client(&self) -> Client {
        let sdk_config = self.load_config_loader().load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(self.force_path_style);
        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Client::from_conf(builder.build())
    }

    fn load_config_loader(&self) -> ConfigLoader {
        let mut config_loader = aws_config::defaults(BehaviorVersion::latest())
            .region(self.build_region_provider())
            .retry_config(self.build_retry_config())
            .timeout_config(self.build_timeout_config());

        if self.disable_stalled_stream_protection {
            config_loader =
                config_loader.stalled_stream_protection(StalledStreamProtectionConfig::disabled());
        }

        if let Some(profile_files) = self.build_profile_files() {
            config_loader = config_loader.profile_files(profile_files);
        }

        match &self.credential {
            S3Credentials::Profile(profile_name) => {
                config_loader = config_loader.profile_name(profile_name);
            }
            S3Credentials::Credentials { access_keys } => {
                let credentials = Credentials::new(
                    access_keys.access_key.to_string(),
                    access_keys.secret_access_key.to_string(),
                    access_keys.session_token.clone(),
                    None,
                    CREDENTIALS_PROVIDER_NAME,
                );
                config_loader = config_loader.credentials_provider(credentials);
            }
            S3Credentials::FromEnvironment => {}
        }

        config_loader
    }

    fn build_region_provider(&self) -> RegionProviderChain {
        let mut builder = aws_config::profile::ProfileFileRegionProvider::builder();

        if let S3Credentials::Profile(profile_name) = &self.credential {
            builder = builder.profile_name(profile_name);
        }
        if let Some(profile_files) = self.build_profile_files() {
            builder = builder.profile_files(profile_files);
        }

        if matches!(&self.credential, S3Credentials::FromEnvironment) {
            RegionProviderChain::first_try(self.region.clone().map(Region::new))
                .or_default_provider()
        } else {
            RegionProviderChain::first_try(self.region.clone().map(Region::new))
                .or_else(builder.build())
        }
    }

    fn build_profile_files(&self) -> Option<ProfileFiles> {
        let location = &self.client_config_location;
        if location.aws_config_file.is_none() && location.aws_shared_credentials_file.is_none() {
            return None;
        }

        let mut builder = ProfileFiles::builder();
        builder = match &location.aws_config_file {
            Some(aws_config_file) => builder.with_file(ProfileFileKind::Config, aws_config_file),
            None => builder.include_default_config_file(true),
        };
        builder = match &location.aws_shared_credentials_file {
            Some(credentials_file) => builder.with_file(ProfileFileKind::Credentials, credentials_file),
            None => builder.include_default_credentials_file(true),
        };

        Some(builder.build())
    }

    fn build_retry_config(&self) -> RetryConfig {
        RetryConfig::standard()
            .with_max_attempts(self.retry_config.aws_max_attempts)
            .with_initial_backoff(Duration::from_millis(
                self.retry_config.initial_backoff_milliseconds,
            ))
    }

    fn build_timeout_config(&self) -> TimeoutConfig {
        let timeouts = &self.cli_timeout_config;
        let mut builder = TimeoutConfig::builder();
        builder
            .set_operation_timeout(timeouts.operation_timeout_milliseconds.map(Duration::from_millis))
            .set_operation_attempt_timeout(
                timeouts
                    .operation_attempt_timeout_milliseconds
                    .map(Duration::from_millis),
            )
            .set_connect_timeout(timeouts.connect_timeout_milliseconds.map(Duration::from_millis))
            .set_read_timeout(timeouts.read_timeout_milliseconds.map(Duration::from_millis));
        builder.build()
    }
}

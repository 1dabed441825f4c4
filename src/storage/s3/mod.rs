pub mod client_builder;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::SdkError;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::storage::{ObjectPage, Storage, StorageFactory, StorageTrait, VersionPage};
use crate::types::error::S3kitError;

/// Extracts the S3 error code and message from an AWS SDK error.
///
/// For service errors (S3 API responses), returns the S3 error code
/// (e.g. "AccessDenied", "NoSuchBucket") and the human-readable error
/// message from the response. For other error types (network, timeout,
/// construction failure), returns "N/A" as the code and the full error
/// description as the message.
fn extract_sdk_error_details<E: std::fmt::Display + ProvideErrorMetadata>(
    e: &SdkError<E>,
) -> (String, String) {
    if let Some(service_err) = e.as_service_error() {
        (
            service_err.code().unwrap_or("unknown").to_string(),
            service_err.message().unwrap_or("no message").to_string(),
        )
    } else {
        ("N/A".to_string(), e.to_string())
    }
}

/// Map an SDK failure against `bucket` onto the user-facing error kinds.
///
/// `HeadBucket` responses have no body, so the HTTP status is checked as
/// well as the error code.
fn classify_sdk_error<E>(bucket: &str, e: &SdkError<E, HttpResponse>) -> S3kitError
where
    E: std::error::Error + ProvideErrorMetadata + 'static,
{
    let status = e.raw_response().map(|response| response.status().as_u16());
    let code = e.as_service_error().and_then(|service_err| service_err.code());

    if is_credentials_error(e) {
        S3kitError::CredentialsMissing
    } else if status == Some(404) || matches!(code, Some("NoSuchBucket") | Some("NotFound")) {
        S3kitError::NotFound(format!("Bucket '{bucket}' does not exist."))
    } else if status == Some(403) || matches!(code, Some("AccessDenied") | Some("Forbidden")) {
        S3kitError::AccessDenied(format!(
            "Access denied to bucket '{bucket}'. Check your permissions."
        ))
    } else {
        S3kitError::Transport(format!("{}", DisplayErrorContext(e)))
    }
}

/// Whether identity resolution failed before the request was sent.
fn is_credentials_error(e: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = Some(e);
    while let Some(err) = source {
        if err.is::<CredentialsError>() {
            return true;
        }
        source = err.source();
    }
    false
}

/// Factory for creating S3 storage instances.
pub struct S3StorageFactory;

#[async_trait]
impl StorageFactory for S3StorageFactory {
    async fn create(bucket: String, client_config: Option<ClientConfig>) -> Storage {
        let client = if let Some(ref client_config) = client_config {
            client_config.create_client().await
        } else {
            Client::new(&aws_config::load_defaults(BehaviorVersion::latest()).await)
        };

        Box::new(S3Storage {
            bucket,
            client: Arc::new(client),
        })
    }
}

/// `StorageTrait` backed by the AWS SDK.
#[derive(Clone)]
struct S3Storage {
    bucket: String,
    client: Arc<Client>,
}

#[async_trait]
impl StorageTrait for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn probe_bucket(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                let (s3_error_code, s3_error_message) = extract_sdk_error_details(&e);
                tracing::error!(
                    bucket = self.bucket,
                    s3_error_code = s3_error_code,
                    s3_error_message = s3_error_message,
                    "S3 HeadBucket API call failed for bucket '{}': {} ({}).",
                    self.bucket,
                    s3_error_code,
                    s3_error_message,
                );
                anyhow!(classify_sdk_error(&self.bucket, &e))
                    .context("aws_sdk_s3::client::head_bucket() failed.")
            })?;

        tracing::debug!(bucket = self.bucket, "bucket is accessible.");

        Ok(())
    }

    async fn list_objects_page(
        &self,
        continuation_token: Option<String>,
        max_keys: i32,
    ) -> Result<ObjectPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_continuation_token(continuation_token)
            .max_keys(max_keys)
            .send()
            .await
            .map_err(|e| {
                let (s3_error_code, s3_error_message) = extract_sdk_error_details(&e);
                tracing::error!(
                    bucket = self.bucket,
                    s3_error_code = s3_error_code,
                    s3_error_message = s3_error_message,
                    "S3 ListObjectsV2 API call failed for s3://{}: {} ({}).",
                    self.bucket,
                    s3_error_code,
                    s3_error_message,
                );
                anyhow!(classify_sdk_error(&self.bucket, &e))
                    .context("aws_sdk_s3::client::list_objects_v2() failed.")
            })?;

        Ok(ObjectPage {
            objects: output.contents().to_vec(),
            next_continuation_token: output.next_continuation_token().map(String::from),
            is_truncated: output.is_truncated() == Some(true),
        })
    }

    async fn list_object_versions_page(
        &self,
        key_marker: Option<String>,
        version_id_marker: Option<String>,
        max_keys: i32,
    ) -> Result<VersionPage> {
        let output = self
            .client
            .list_object_versions()
            .bucket(&self.bucket)
            .set_key_marker(key_marker)
            .set_version_id_marker(version_id_marker)
            .max_keys(max_keys)
            .send()
            .await
            .map_err(|e| {
                let (s3_error_code, s3_error_message) = extract_sdk_error_details(&e);
                tracing::error!(
                    bucket = self.bucket,
                    s3_error_code = s3_error_code,
                    s3_error_message = s3_error_message,
                    "S3 ListObjectVersions API call failed for s3://{}: {} ({}).",
                    self.bucket,
                    s3_error_code,
                    s3_error_message,
                );
                anyhow!(classify_sdk_error(&self.bucket, &e))
                    .context("aws_sdk_s3::client::list_object_versions() failed.")
            })?;

        Ok(VersionPage {
            delete_markers: output.delete_markers().to_vec(),
            next_key_marker: output.next_key_marker().map(String::from),
            next_version_id_marker: output.next_version_id_marker().map(String::from),
            is_truncated: output.is_truncated() == Some(true),
        })
    }
}

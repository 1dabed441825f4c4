use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::types::{DeleteMarkerEntry, Object};
use dyn_clone::DynClone;

use crate::config::ClientConfig;

pub mod s3;

/// Type alias for a boxed Storage trait object.
pub type Storage = Box<dyn StorageTrait + Send + Sync>;

/// Factory trait for creating Storage instances.
#[async_trait]
pub trait StorageFactory {
    async fn create(bucket: String, client_config: Option<ClientConfig>) -> Storage;
}

/// One `ListObjectsV2` response, reduced to what the paginator needs.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    pub objects: Vec<Object>,
    pub next_continuation_token: Option<String>,
    pub is_truncated: bool,
}

/// One `ListObjectVersions` response. Object versions are dropped; only
/// delete markers are kept.
#[derive(Debug, Clone, Default)]
pub struct VersionPage {
    pub delete_markers: Vec<DeleteMarkerEntry>,
    pub next_key_marker: Option<String>,
    pub next_version_id_marker: Option<String>,
    pub is_truncated: bool,
}

/// Remote listing operations used by the inventory and delete marker tools.
///
/// Each call issues exactly one request. Pagination state lives in the
/// caller so it can be tested against a mock implementation.
#[async_trait]
pub trait StorageTrait: DynClone {
    /// Name of the bucket this storage lists.
    fn bucket(&self) -> &str;

    /// Check that credentials are available and the bucket is reachable.
    ///
    /// Failures carry a [`crate::types::error::S3kitError`] of kind
    /// `CredentialsMissing`, `NotFound`, `AccessDenied` or `Transport`.
    async fn probe_bucket(&self) -> Result<()>;

    /// Fetch one page of objects. `continuation_token` is `None` for the
    /// first request.
    async fn list_objects_page(
        &self,
        continuation_token: Option<String>,
        max_keys: i32,
    ) -> Result<ObjectPage>;

    /// Fetch one page of object versions, starting after the given markers.
    async fn list_object_versions_page(
        &self,
        key_marker: Option<String>,
        version_id_marker: Option<String>,
        max_keys: i32,
    ) -> Result<VersionPage>;
}

dyn_clone::clone_trait_object!(StorageTrait);

/// Create an S3 storage for `bucket`.
///
/// Without a client configuration the default AWS credential and region
/// chain is used.
pub async fn create_storage(bucket: &str, client_config: Option<ClientConfig>) -> Storage {
    s3::S3StorageFactory::create(bucket.to_string(), client_config).await
}

//! Shared test utilities for the s3kit library crate.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::primitives::DateTime;
use aws_sdk_s3::types::{DeleteMarkerEntry, Object, Owner};

use crate::storage::{ObjectPage, StorageTrait, VersionPage};
use crate::types::error::S3kitError;

/// Initialise a dummy tracing subscriber for tests.
///
/// Uses `try_init` so that only the first call in a process actually
/// installs the subscriber; subsequent calls are silently ignored.
pub(crate) fn init_dummy_tracing_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dummy=trace")
        .try_init();
}

/// Create an [`Object`] with the given key and modification time.
pub(crate) fn make_object(key: &str, last_modified_secs: i64) -> Object {
    Object::builder()
        .key(key)
        .size(100)
        .last_modified(DateTime::from_secs(last_modified_secs))
        .build()
}

/// Create a page of objects. The page is truncated iff `next_token` is set.
pub(crate) fn make_object_page(keys: &[&str], next_token: Option<&str>) -> ObjectPage {
    ObjectPage {
        objects: keys.iter().map(|key| make_object(key, 1_700_000_000)).collect(),
        next_continuation_token: next_token.map(String::from),
        is_truncated: next_token.is_some(),
    }
}

/// Create a delete marker; `owner` is the display name, if any.
pub(crate) fn make_delete_marker(
    key: &str,
    version_id: &str,
    last_modified_secs: i64,
    owner: Option<&str>,
) -> DeleteMarkerEntry {
    let mut builder = DeleteMarkerEntry::builder()
        .key(key)
        .version_id(version_id)
        .is_latest(true)
        .last_modified(DateTime::from_secs(last_modified_secs));
    if let Some(owner) = owner {
        builder = builder.owner(Owner::builder().display_name(owner).id("owner-id").build());
    }
    builder.build()
}

/// Create a version page carrying the given delete markers.
pub(crate) fn make_version_page(
    delete_markers: Vec<DeleteMarkerEntry>,
    next_markers: Option<(&str, &str)>,
) -> VersionPage {
    VersionPage {
        delete_markers,
        next_key_marker: next_markers.map(|(key, _)| key.to_string()),
        next_version_id_marker: next_markers.map(|(_, version_id)| version_id.to_string()),
        is_truncated: next_markers.is_some(),
    }
}

/// Mock storage serving pre-configured pages in order.
///
/// Counts calls per operation and records the cursor of every request so
/// tests can assert the exact request sequence. Requesting more pages than
/// configured is an error.
#[derive(Clone, Default)]
pub(crate) struct MockStorage {
    pub bucket: String,
    pub probe_error: Option<S3kitError>,
    pub object_pages: Vec<ObjectPage>,
    pub version_pages: Vec<VersionPage>,
    pub probe_called: Arc<AtomicU32>,
    pub list_objects_called: Arc<AtomicU32>,
    pub list_object_versions_called: Arc<AtomicU32>,
    pub requested_tokens: Arc<Mutex<Vec<Option<String>>>>,
    pub requested_markers: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
}

impl MockStorage {
    pub(crate) fn with_object_pages(pages: Vec<ObjectPage>) -> Self {
        Self {
            bucket: "test-bucket".to_string(),
            object_pages: pages,
            ..Default::default()
        }
    }

    pub(crate) fn with_version_pages(pages: Vec<VersionPage>) -> Self {
        Self {
            bucket: "test-bucket".to_string(),
            version_pages: pages,
            ..Default::default()
        }
    }

    pub(crate) fn with_probe_error(error: S3kitError) -> Self {
        Self {
            bucket: "test-bucket".to_string(),
            probe_error: Some(error),
            ..Default::default()
        }
    }

    pub(crate) fn requested_tokens(&self) -> Vec<Option<String>> {
        self.requested_tokens.lock().unwrap().clone()
    }

    pub(crate) fn requested_markers(&self) -> Vec<(Option<String>, Option<String>)> {
        self.requested_markers.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageTrait for MockStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn probe_bucket(&self) -> Result<()> {
        self.probe_called.fetch_add(1, Ordering::SeqCst);
        match &self.probe_error {
            Some(error) => Err(anyhow!(error.clone())),
            None => Ok(()),
        }
    }

    async fn list_objects_page(
        &self,
        continuation_token: Option<String>,
        _max_keys: i32,
    ) -> Result<ObjectPage> {
        let index = self.list_objects_called.fetch_add(1, Ordering::SeqCst) as usize;
        self.requested_tokens
            .lock()
            .unwrap()
            .push(continuation_token);

        self.object_pages
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("unexpected ListObjectsV2 request #{}", index + 1))
    }

    async fn list_object_versions_page(
        &self,
        key_marker: Option<String>,
        version_id_marker: Option<String>,
        _max_keys: i32,
    ) -> Result<VersionPage> {
        let index = self.list_object_versions_called.fetch_add(1, Ordering::SeqCst) as usize;
        self.requested_markers
            .lock()
            .unwrap()
            .push((key_marker, version_id_marker));

        self.version_pages
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("unexpected ListObjectVersions request #{}", index + 1))
    }
}

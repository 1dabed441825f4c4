//! Shared integration test infrastructure for s3kit.
//!
//! Local helpers build file trees in temporary directories. The S3 helpers
//! are only compiled for the `e2e_test` suites and run against real AWS S3
//! with the `s3kit-e2e-test` profile.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary directory populated with files for a single test.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create `relative` (with parents) containing `content`.
    pub fn file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    /// Entry names directly under `relative`, sorted.
    pub fn names_in(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path().join(relative))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

#[cfg(e2e_test)]
pub use e2e::S3TestHelper;

#[cfg(e2e_test)]
mod e2e {
    use aws_config::BehaviorVersion;
    use aws_sdk_s3::Client;
    use aws_sdk_s3::primitives::ByteStream;
    use aws_sdk_s3::types::{
        BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
        VersioningConfiguration,
    };
    use rand::Rng;

    /// AWS profile used for all E2E tests.
    pub const AWS_PROFILE: &str = "s3kit-e2e-test";

    pub struct S3TestHelper {
        client: Client,
        region: String,
    }

    impl S3TestHelper {
        pub async fn new() -> Self {
            let config = aws_config::defaults(BehaviorVersion::latest())
                .profile_name(AWS_PROFILE)
                .load()
                .await;
            let region = config
                .region()
                .map(|region| region.to_string())
                .unwrap_or_else(|| "us-east-1".to_string());

            Self {
                client: Client::new(&config),
                region,
            }
        }

        pub fn generate_bucket_name(&self) -> String {
            let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
            format!(
                "s3kit-e2e-{}-{suffix:06}",
                chrono::Utc::now().format("%Y%m%d%H%M%S")
            )
        }

        pub async fn create_bucket(&self, bucket: &str) {
            let mut request = self.client.create_bucket().bucket(bucket);
            if self.region != "us-east-1" {
                request = request.create_bucket_configuration(
                    CreateBucketConfiguration::builder()
                        .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                        .build(),
                );
            }
            request.send().await.unwrap();
        }

        pub async fn enable_versioning(&self, bucket: &str) {
            self.client
                .put_bucket_versioning()
                .bucket(bucket)
                .versioning_configuration(
                    VersioningConfiguration::builder()
                        .status(BucketVersioningStatus::Enabled)
                        .build(),
                )
                .send()
                .await
                .unwrap();
        }

        pub async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) {
            self.client
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(ByteStream::from(body))
                .send()
                .await
                .unwrap();
        }

        pub async fn delete_object(&self, bucket: &str, key: &str) {
            self.client
                .delete_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .unwrap();
        }

        /// Remove every version and delete marker, then the bucket.
        pub async fn delete_bucket_with_cleanup(&self, bucket: &str) {
            let mut key_marker: Option<String> = None;
            let mut version_id_marker: Option<String> = None;

            loop {
                let output = self
                    .client
                    .list_object_versions()
                    .bucket(bucket)
                    .set_key_marker(key_marker.take())
                    .set_version_id_marker(version_id_marker.take())
                    .send()
                    .await
                    .unwrap();

                let mut entries: Vec<(String, Option<String>)> = Vec::new();
                for version in output.versions() {
                    if let Some(key) = version.key() {
                        entries.push((key.to_string(), version.version_id().map(str::to_string)));
                    }
                }
                for marker in output.delete_markers() {
                    if let Some(key) = marker.key() {
                        entries.push((key.to_string(), marker.version_id().map(str::to_string)));
                    }
                }

                for (key, version_id) in entries {
                    self.client
                        .delete_object()
                        .bucket(bucket)
                        .key(key)
                        .set_version_id(version_id)
                        .send()
                        .await
                        .unwrap();
                }

                if !output.is_truncated().unwrap_or(false) {
                    break;
                }
                key_marker = output.next_key_marker().map(str::to_string);
                version_id_marker = output.next_version_id_marker().map(str::to_string);
            }

            self.client
                .delete_bucket()
                .bucket(bucket)
                .send()
                .await
                .unwrap();
        }
    }
}

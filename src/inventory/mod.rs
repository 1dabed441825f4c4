//! Bucket inventory.
//!
//! [`InventoryLister`] pages through `ListObjectsV2`, drops excluded keys and
//! streams the surviving rows, in listing order, to a channel. The CSV
//! writer on the other end runs as a separate task.
//!
//! ```text
//! HeadBucket → ListObjectsV2 (page 1..n) → exclusion filter → channel → CSV
//! ```

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use async_channel::Sender;
use tracing::debug;

use crate::config::FilterConfig;
use crate::storage::Storage;
use crate::types::InventoryRow;
use crate::types::error::S3kitError;

pub mod csv_writer;
pub mod filter;

pub use csv_writer::{InventoryCsvWriter, write_inventory};
pub use filter::is_excluded;

pub struct InventoryLister {
    storage: Storage,
    filter_config: FilterConfig,
    max_keys: i32,
}

impl InventoryLister {
    pub fn new(storage: Storage, filter_config: FilterConfig, max_keys: i32) -> Self {
        Self {
            storage,
            filter_config,
            max_keys,
        }
    }

    /// Check that the bucket exists and is reachable with the configured
    /// credentials.
    pub async fn probe(&self) -> Result<()> {
        debug!(bucket = self.storage.bucket(), "probing bucket.");
        self.storage.probe_bucket().await
    }

    /// Probe the bucket, then send every non-excluded object to `sender`.
    ///
    /// Pages are requested strictly one after another; the first request
    /// carries no continuation token and each later one carries the token of
    /// the page before it. Listing stops on the first page that is not
    /// truncated. Returns the number of rows sent.
    ///
    /// If the receiving side is closed the listing stops early without
    /// error.
    ///
    /// # Errors
    ///
    /// - Probe failures (`NotFound`, `AccessDenied`, `CredentialsMissing`,
    ///   `Transport`); no listing request is made in that case.
    /// - Any failed page request.
    /// - [`S3kitError::Transport`] if a truncated page has no continuation
    ///   token.
    pub async fn list(&self, sender: &Sender<InventoryRow>) -> Result<u64> {
        self.probe().await?;
        self.list_pages(sender, |_| {}).await
    }

    /// Page through the bucket without probing it first.
    ///
    /// `on_page` receives the running number of emitted rows after every
    /// page.
    pub async fn list_pages<F>(&self, sender: &Sender<InventoryRow>, mut on_page: F) -> Result<u64>
    where
        F: FnMut(u64),
    {
        let bucket = self.storage.bucket().to_string();
        debug!(bucket = bucket, "inventory listing has started.");

        let mut continuation_token: Option<String> = None;
        let mut emitted: u64 = 0;
        let mut pages: u64 = 0;

        loop {
            let page = self
                .storage
                .list_objects_page(continuation_token.take(), self.max_keys)
                .await?;
            pages += 1;

            for object in &page.objects {
                let key = object.key().unwrap_or_default();
                if is_excluded(key, &self.filter_config) {
                    continue;
                }

                let row = InventoryRow::from_object(&bucket, object);
                if let Err(e) = sender
                    .send(row)
                    .await
                    .context("async_channel::Sender::send() failed.")
                {
                    return if !sender.is_closed() { Err(e) } else { Ok(emitted) };
                }
                emitted += 1;
            }

            debug!(bucket = bucket, page = pages, emitted = emitted, "page has been listed.");
            on_page(emitted);

            if !page.is_truncated {
                break;
            }

            match page.next_continuation_token {
                Some(token) => continuation_token = Some(token),
                None => {
                    return Err(anyhow!(S3kitError::Transport(format!(
                        "ListObjectsV2 page {pages} for bucket '{bucket}' is truncated but has no continuation token."
                    ))));
                }
            }
        }

        debug!(
            bucket = bucket,
            pages = pages,
            emitted = emitted,
            "inventory listing has been completed."
        );

        Ok(emitted)
    }
}

/// Probe the bucket, then stream its inventory into a CSV file at
/// `output_file`.
///
/// The output file is only created once the probe has succeeded, so a
/// missing or inaccessible bucket leaves any existing file untouched.
/// Returns the number of rows written.
pub async fn dump_inventory<F>(
    lister: &InventoryLister,
    output_file: &Path,
    channel_capacity: usize,
    on_page: F,
) -> Result<u64>
where
    F: FnMut(u64),
{
    lister.probe().await?;

    let writer = InventoryCsvWriter::create(output_file)?;
    let (sender, receiver) = async_channel::bounded(channel_capacity);
    let writer_join_handle = tokio::spawn(write_inventory(receiver, writer));

    let listed = lister.list_pages(&sender, on_page).await;
    sender.close();

    let written = writer_join_handle
        .await
        .map_err(|e| anyhow!("inventory writer task failed: {e}"))??;
    let listed = listed?;

    debug!(listed = listed, written = written, "inventory dump has been completed.");

    Ok(written)
}

/// List the whole inventory of `storage` into memory.
pub async fn list_inventory(
    storage: Storage,
    filter_config: FilterConfig,
    max_keys: i32,
) -> Result<Vec<InventoryRow>> {
    let (sender, receiver) = async_channel::unbounded();
    let lister = InventoryLister::new(storage, filter_config, max_keys);

    lister.list(&sender).await?;
    sender.close();

    let mut rows = Vec::new();
    while let Ok(row) = receiver.recv().await {
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockStorage, init_dummy_tracing_subscriber, make_object_page};
    use crate::types::error::find_s3kit_error;
    use std::sync::atomic::Ordering;

    fn keys(rows: &[InventoryRow]) -> Vec<&str> {
        rows.iter().map(|row| row.key.as_str()).collect()
    }

    #[tokio::test]
    async fn single_page_lists_everything() {
        init_dummy_tracing_subscriber();

        let mock = MockStorage::with_object_pages(vec![make_object_page(
            &["a.txt", "b/c.txt"],
            None,
        )]);
        let calls = mock.list_objects_called.clone();

        let rows = list_inventory(Box::new(mock.clone()), FilterConfig::default(), 1000)
            .await
            .unwrap();

        assert_eq!(keys(&rows), vec!["a.txt", "b/c.txt"]);
        assert_eq!(rows[1].full_path(), "s3://test-bucket/b/c.txt");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.probe_called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pages_are_followed_with_previous_token() {
        init_dummy_tracing_subscriber();

        let mock = MockStorage::with_object_pages(vec![
            make_object_page(&["1", "2"], Some("t1")),
            make_object_page(&["3"], Some("t2")),
            make_object_page(&["4", "5"], None),
        ]);

        let rows = list_inventory(Box::new(mock.clone()), FilterConfig::default(), 2)
            .await
            .unwrap();

        assert_eq!(keys(&rows), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(mock.list_objects_called.load(Ordering::SeqCst), 3);
        assert_eq!(
            mock.requested_tokens(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn exclusions_are_applied_per_item() {
        init_dummy_tracing_subscriber();

        let mock = MockStorage::with_object_pages(vec![
            make_object_page(&["logs/1.log", "a.JPG", "dir/"], Some("next")),
            make_object_page(&["keep/b.png", "keep/c.txt"], None),
        ]);
        let filter_config = FilterConfig::new(["logs"], ["jpg", "png"]);

        let lister = InventoryLister::new(Box::new(mock), filter_config, 1000);
        let (sender, receiver) = async_channel::unbounded();
        let emitted = lister.list(&sender).await.unwrap();
        sender.close();

        assert_eq!(emitted, 1);
        assert_eq!(receiver.recv().await.unwrap().key, "keep/c.txt");
        assert!(receiver.recv().await.is_err());
    }

    #[tokio::test]
    async fn empty_bucket_lists_nothing() {
        init_dummy_tracing_subscriber();

        let mock = MockStorage::with_object_pages(vec![make_object_page(&[], None)]);

        let rows = list_inventory(Box::new(mock), FilterConfig::default(), 1000)
            .await
            .unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn probe_failure_prevents_listing() {
        init_dummy_tracing_subscriber();

        let mock = MockStorage::with_probe_error(S3kitError::NotFound(
            "Bucket 'test-bucket' does not exist.".to_string(),
        ));

        let err = list_inventory(Box::new(mock.clone()), FilterConfig::default(), 1000)
            .await
            .unwrap_err();

        assert!(matches!(
            find_s3kit_error(&err),
            Some(S3kitError::NotFound(_))
        ));
        assert_eq!(mock.list_objects_called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn truncated_page_without_token_is_transport_error() {
        init_dummy_tracing_subscriber();

        let mut page = make_object_page(&["a"], None);
        page.is_truncated = true;
        let mock = MockStorage::with_object_pages(vec![page]);

        let err = list_inventory(Box::new(mock.clone()), FilterConfig::default(), 1000)
            .await
            .unwrap_err();

        assert!(matches!(
            find_s3kit_error(&err),
            Some(S3kitError::Transport(_))
        ));
        assert_eq!(mock.list_objects_called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn page_failure_aborts_listing() {
        init_dummy_tracing_subscriber();

        // Second page is never configured, so the mock fails the request.
        let mock = MockStorage::with_object_pages(vec![make_object_page(&["a"], Some("t1"))]);

        let result = list_inventory(Box::new(mock), FilterConfig::default(), 1000).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dump_writes_csv_and_reports_progress() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let output_file = dir.path().join("test-bucket_inventory.csv");
        let mock = MockStorage::with_object_pages(vec![
            make_object_page(&["a.txt"], Some("t1")),
            make_object_page(&["b/c.txt"], None),
        ]);
        let lister = InventoryLister::new(Box::new(mock), FilterConfig::default(), 1);

        let mut progress = Vec::new();
        let written = dump_inventory(&lister, &output_file, 4, |emitted| progress.push(emitted))
            .await
            .unwrap();

        assert_eq!(written, 2);
        assert_eq!(progress, vec![1, 2]);
        let csv = std::fs::read_to_string(&output_file).unwrap();
        assert!(csv.starts_with("Last Modified,Full Path,Filename\n"));
        assert!(csv.contains("s3://test-bucket/b/c.txt,c.txt"));
    }

    #[tokio::test]
    async fn failed_probe_leaves_existing_output_untouched() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let output_file = dir.path().join("test-bucket_inventory.csv");
        std::fs::write(&output_file, "PREVIOUS GOOD INVENTORY\n").unwrap();
        let mock = MockStorage::with_probe_error(S3kitError::Transport(
            "connection refused".to_string(),
        ));
        let lister = InventoryLister::new(Box::new(mock.clone()), FilterConfig::default(), 1000);

        let err = dump_inventory(&lister, &output_file, 4, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(
            find_s3kit_error(&err),
            Some(S3kitError::Transport(_))
        ));
        assert_eq!(
            std::fs::read_to_string(&output_file).unwrap(),
            "PREVIOUS GOOD INVENTORY\n"
        );
        assert_eq!(mock.list_objects_called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_probe_creates_no_output() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let output_file = dir.path().join("missing_inventory.csv");
        let mock = MockStorage::with_probe_error(S3kitError::NotFound(
            "Bucket 'test-bucket' does not exist.".to_string(),
        ));
        let lister = InventoryLister::new(Box::new(mock), FilterConfig::default(), 1000);

        assert!(dump_inventory(&lister, &output_file, 4, |_| {}).await.is_err());
        assert!(!output_file.exists());
    }

    #[tokio::test]
    async fn closed_receiver_stops_listing() {
        init_dummy_tracing_subscriber();

        let mock = MockStorage::with_object_pages(vec![make_object_page(&["a", "b"], None)]);
        let lister = InventoryLister::new(Box::new(mock), FilterConfig::default(), 1000);
        let (sender, receiver) = async_channel::bounded(1);
        drop(receiver);

        assert_eq!(lister.list(&sender).await.unwrap(), 0);
    }
}

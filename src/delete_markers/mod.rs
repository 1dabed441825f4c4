//! Delete marker listing for versioned buckets.

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use crate::storage::Storage;
use crate::types::DeleteMarkerRow;
use crate::types::error::S3kitError;

const KEY_WIDTH: usize = 50;
const VERSION_ID_WIDTH: usize = 36;
const LAST_MODIFIED_WIDTH: usize = 20;
const RULE_WIDTH: usize = 120;

pub struct DeleteMarkerLister {
    storage: Storage,
    max_keys: i32,
}

impl DeleteMarkerLister {
    pub fn new(storage: Storage, max_keys: i32) -> Self {
        Self { storage, max_keys }
    }

    /// Probe the bucket and collect every delete marker, in listing order.
    ///
    /// Object versions are ignored. Each request after the first carries the
    /// key and version-id markers returned by the previous page.
    pub async fn list(&self) -> Result<Vec<DeleteMarkerRow>> {
        let bucket = self.storage.bucket().to_string();
        debug!(bucket = bucket, "delete marker listing has started.");

        self.storage.probe_bucket().await?;

        let mut key_marker: Option<String> = None;
        let mut version_id_marker: Option<String> = None;
        let mut rows = Vec::new();
        let mut pages: u64 = 0;

        loop {
            let page = self
                .storage
                .list_object_versions_page(key_marker.take(), version_id_marker.take(), self.max_keys)
                .await?;
            pages += 1;

            rows.extend(page.delete_markers.iter().map(DeleteMarkerRow::from_entry));
            info!(
                bucket = bucket,
                page = pages,
                delete_markers = rows.len(),
                "Processed {} delete markers...",
                rows.len()
            );

            if !page.is_truncated {
                break;
            }

            if page.next_key_marker.is_none() && page.next_version_id_marker.is_none() {
                return Err(anyhow!(S3kitError::Transport(format!(
                    "ListObjectVersions page {pages} for bucket '{bucket}' is truncated but has no markers."
                ))));
            }
            key_marker = page.next_key_marker;
            version_id_marker = page.next_version_id_marker;
        }

        debug!(
            bucket = bucket,
            pages = pages,
            delete_markers = rows.len(),
            "delete marker listing has been completed."
        );

        Ok(rows)
    }
}

/// Render delete markers as a fixed-width table.
///
/// Cells are padded, never truncated.
pub fn format_table(rows: &[DeleteMarkerRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);

    lines.push(format!(
        "{:<KEY_WIDTH$} {:<VERSION_ID_WIDTH$} {:<LAST_MODIFIED_WIDTH$} {}",
        "Key", "Version ID", "Last Modified", "Owner"
    ));
    lines.push("-".repeat(RULE_WIDTH));

    for row in rows {
        lines.push(format!(
            "{:<KEY_WIDTH$} {:<VERSION_ID_WIDTH$} {:<LAST_MODIFIED_WIDTH$} {}",
            row.key,
            row.version_id,
            row.formatted_last_modified(),
            row.owner
        ));
    }

    lines.join("\n")
}

pub fn no_delete_markers_message(bucket: &str) -> String {
    format!("No delete markers found in bucket '{bucket}'")
}

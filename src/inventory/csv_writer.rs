use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use async_channel::Receiver;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::types::InventoryRow;
use crate::types::error::S3kitError;

pub const INVENTORY_CSV_HEADER: [&str; 3] = ["Last Modified", "Full Path", "Filename"];

#[derive(Serialize)]
struct InventoryRecord<'a> {
    last_modified: String,
    full_path: String,
    filename: &'a str,
}

impl<'a> From<&'a InventoryRow> for InventoryRecord<'a> {
    fn from(row: &'a InventoryRow) -> Self {
        InventoryRecord {
            last_modified: row.formatted_last_modified(),
            full_path: row.full_path(),
            filename: row.filename(),
        }
    }
}

/// CSV sink for inventory rows.
///
/// The header is written on construction, so an empty inventory still
/// produces a valid file.
pub struct InventoryCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    rows_written: u64,
}

impl InventoryCsvWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            anyhow!(S3kitError::Io(format!(
                "Failed to create '{}': {e}",
                path.display()
            )))
        })?;
        InventoryCsvWriter::new(file)
    }
}

impl<W: Write> InventoryCsvWriter<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(inner);
        writer
            .write_record(INVENTORY_CSV_HEADER)
            .context("csv::Writer::write_record() failed.")?;

        Ok(InventoryCsvWriter {
            writer,
            rows_written: 0,
        })
    }

    pub fn write_row(&mut self, row: &InventoryRow) -> Result<()> {
        self.writer
            .serialize(InventoryRecord::from(row))
            .context("csv::Writer::serialize() failed.")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush buffered rows and return the inner writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow!(S3kitError::Io(e.error().to_string())))
            .context("csv::Writer::into_inner() failed.")
    }
}

/// Drain `receiver` into `writer` until the sending side closes.
///
/// Returns the number of rows written.
pub async fn write_inventory<W: Write>(
    receiver: Receiver<InventoryRow>,
    mut writer: InventoryCsvWriter<W>,
) -> Result<u64> {
    while let Ok(row) = receiver.recv().await {
        writer.write_row(&row)?;
    }

    let rows_written = writer.rows_written();
    writer.finish()?;
    debug!(rows_written = rows_written, "inventory csv has been written.");

    Ok(rows_written)
}

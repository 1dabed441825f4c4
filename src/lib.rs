/*!
# Overview
s3kit is a set of small command-line utilities for working with Amazon S3
buckets and preparing local files for upload.

## Tools
- **s3keycheck**: Checks local file paths for S3 object key compatibility
- **s3inventory**: Writes the full object inventory of a bucket to CSV
- **s3deletemarkers**: Lists the delete markers of a versioned bucket
- **filenormie**: Renames files into a predictable, shell-friendly form
- **populate**: Generates random test files and folder trees

## As a Library
Every binary is a thin wrapper over this library.

Example usage
=============

```toml
[dependencies]
s3kit = "0.1"
tokio = { version = "1", features = ["full"] }
```

```no_run
use s3kit::config::InventoryConfig;
use s3kit::inventory::list_inventory;
use s3kit::storage::create_storage;

#[tokio::main]
async fn main() {
    let config = InventoryConfig::for_bucket("my-bucket");
    let storage = create_storage(&config.bucket, config.client_config.clone()).await;

    match list_inventory(storage, config.filter_config, config.max_keys).await {
        Ok(rows) => {
            for row in rows {
                println!("{},{}", row.filename(), row.full_path());
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}
```

Key validation needs no AWS access:

```
use s3kit::key_check::validate_key;

assert!(validate_key("photos/2024/cat.jpg").is_valid);
assert!(!validate_key("bad{name}.txt").is_valid);
```
*/

#![allow(clippy::collapsible_if)]

pub mod config;
pub mod delete_markers;
pub mod inventory;
pub mod key_check;
pub mod normalize;
pub mod populate;
pub mod storage;
pub mod tracing_init;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

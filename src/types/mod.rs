use std::fmt;
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use aws_sdk_s3::types::{DeleteMarkerEntry, Object};
use aws_smithy_types_convert::date_time::DateTimeExt;
use chrono::{DateTime, Utc};
use zeroize_derive::{Zeroize, ZeroizeOnDrop};

pub mod error;

const S3_SCHEME: &str = "s3://";
const INVENTORY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const DELETE_MARKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UNKNOWN_OWNER: &str = "Unknown";

/// One surviving object of an inventory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub last_modified: DateTime<Utc>,
    pub bucket: String,
    pub key: String,
}

impl InventoryRow {
    pub fn from_object(bucket: &str, object: &Object) -> Self {
        Self {
            last_modified: to_chrono_utc(object.last_modified()),
            bucket: bucket.to_string(),
            key: object.key().unwrap_or_default().to_string(),
        }
    }

    /// `s3://bucket/key`
    pub fn full_path(&self) -> String {
        format!("{S3_SCHEME}{}/{}", self.bucket, self.key)
    }

    /// Final path segment after the last `/`, or the whole key.
    pub fn filename(&self) -> &str {
        filename_of(&self.key)
    }

    pub fn formatted_last_modified(&self) -> String {
        self.last_modified
            .format(INVENTORY_TIMESTAMP_FORMAT)
            .to_string()
    }
}

/// A delete marker found in a versioned bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteMarkerRow {
    pub key: String,
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
    pub owner: String,
}

impl DeleteMarkerRow {
    pub fn from_entry(marker: &DeleteMarkerEntry) -> Self {
        Self {
            key: marker.key().unwrap_or_default().to_string(),
            version_id: marker.version_id().unwrap_or_default().to_string(),
            last_modified: to_chrono_utc(marker.last_modified()),
            owner: marker
                .owner()
                .and_then(|owner| owner.display_name())
                .unwrap_or(UNKNOWN_OWNER)
                .to_string(),
        }
    }

    pub fn formatted_last_modified(&self) -> String {
        self.last_modified
            .format(DELETE_MARKER_TIMESTAMP_FORMAT)
            .to_string()
    }
}

/// Final path segment after the last `/`, or the whole key if there is none.
pub fn filename_of(key: &str) -> &str {
    match key.rsplit_once('/') {
        Some((_, filename)) => filename,
        None => key,
    }
}

fn to_chrono_utc(last_modified: Option<&aws_sdk_s3::primitives::DateTime>) -> DateTime<Utc> {
    last_modified
        .and_then(|t| t.to_chrono_utc().ok())
        .unwrap_or_default()
}

/// AWS configuration file locations.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigLocation {
    pub aws_config_file: Option<PathBuf>,
    pub aws_shared_credentials_file: Option<PathBuf>,
}

/// AWS credential sources supported by the S3 tools.
#[derive(Debug, Clone)]
pub enum S3Credentials {
    Profile(String),
    Credentials { access_keys: AccessKeys },
    FromEnvironment,
}

/// AWS access key pair with secure zeroization.
///
/// The secret_access_key and session_token are securely cleared from memory
/// when this struct is dropped, using the zeroize crate.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessKeys {
    pub access_key: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Debug for AccessKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut keys = f.debug_struct("AccessKeys");
        let session_token = self
            .session_token
            .as_ref()
            .map_or("None", |_| "** redacted **");
        keys.field("access_key", &self.access_key)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &session_token);
        keys.finish()
    }
}

//! Exclusion rules for inventory listings.
//!
//! An object is excluded if its key starts with an excluded prefix, ends
//! with an excluded extension, or is a directory marker (ends with `/`).
//! The checks are independent vetoes.

use tracing::debug;

use crate::config::FilterConfig;

const FILTER_NAME: &str = "InventoryExclusionFilter";

/// Why a key was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    DirectoryMarker,
    Prefix,
    Extension,
}

/// Returns the first rule excluding `key`, or `None` if it should be emitted.
pub fn exclusion_for(key: &str, config: &FilterConfig) -> Option<Exclusion> {
    if key.ends_with('/') {
        return Some(Exclusion::DirectoryMarker);
    }

    if config
        .excluded_prefixes
        .iter()
        .any(|prefix| key.starts_with(prefix.as_str()))
    {
        return Some(Exclusion::Prefix);
    }

    if let Some(extension) = extension_of(key) {
        if config
            .excluded_extensions
            .iter()
            .any(|excluded| *excluded == extension)
        {
            return Some(Exclusion::Extension);
        }
    }

    None
}

pub fn is_excluded(key: &str, config: &FilterConfig) -> bool {
    match exclusion_for(key, config) {
        Some(exclusion) => {
            debug!(
                name = FILTER_NAME,
                key = key,
                exclusion = ?exclusion,
                "object filtered."
            );
            true
        }
        None => false,
    }
}

/// Lower-cased text from the final dot of the key, including the dot.
fn extension_of(key: &str) -> Option<String> {
    key.rfind('.').map(|idx| key[idx..].to_lowercase())
}

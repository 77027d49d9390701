//! Record key parsing.

use crate::{Error, Result};

/// Split a record key of the form `/namespace/path` into its namespace and path.
///
/// A single leading slash is optional. The key is split on the first
/// remaining slash only, so the path may itself contain slashes.
pub fn split_key(key: &str) -> Result<(&str, &str)> {
    if key.is_empty() {
        return Err(Error::InvalidKeyFormat("empty key".to_string()));
    }

    let stripped = key.strip_prefix('/').unwrap_or(key);

    let (namespace, path) = stripped
        .split_once('/')
        .ok_or_else(|| Error::InvalidKeyFormat(format!("invalid key format: {key}")))?;

    if namespace.is_empty() {
        return Err(Error::InvalidKeyFormat("empty namespace".to_string()));
    }

    if path.is_empty() {
        return Err(Error::InvalidKeyFormat("empty path".to_string()));
    }

    Ok((namespace, path))
}

//! Built-in validator for the `pk` namespace.

use bytes::Bytes;

use crate::common::{split_key, PeerId};
use crate::validator::{PublicKeyEnvelope, Validator};
use crate::{Error, Result};

/// Namespace of public key records, `/pk/<base58 peer id>`.
pub const PUBLIC_KEY_NAMESPACE: &str = "pk";

#[derive(Debug, Clone, Default)]
/// Validator for public key records.
///
/// The key path must be a base58 encoded multihash, and the value a
/// serialized [PublicKeyEnvelope]. With linkage enabled, the peer id in the
/// key must also be derived from the public key in the value.
pub struct PublicKeyValidator {
    verify_linkage: bool,
}

impl PublicKeyValidator {
    pub fn new() -> Self {
        Self::default()
    }

    // === Options ===

    /// Require the key's peer id to be [PeerId::from_public_key] of the value.
    pub fn with_linkage(mut self, verify_linkage: bool) -> Self {
        self.verify_linkage = verify_linkage;
        self
    }
}

impl Validator for PublicKeyValidator {
    fn validate(&self, key: &str, value: &[u8]) -> Result<()> {
        let (namespace, path) = split_key(key)?;

        if namespace != PUBLIC_KEY_NAMESPACE {
            return Err(Error::InvalidRecordType(format!(
                "invalid namespace for public key validator: {namespace}"
            )));
        }

        let peer_id = PeerId::from_base58(path)
            .map_err(|error| Error::InvalidMultihash(format!("invalid peer id in key: {error}")))?;

        PublicKeyEnvelope::from_bytes(value)?;

        if self.verify_linkage && PeerId::from_public_key(value)? != peer_id {
            return Err(Error::InvalidPublicKey(format!(
                "public key does not match peer id {peer_id}"
            )));
        }

        Ok(())
    }

    /// There is only one valid public key per peer id, so the first value is
    /// selected, and only if it is valid.
    fn select(&self, key: &str, values: &[Bytes]) -> Result<usize> {
        let first = values.first().ok_or(Error::EmptyCandidateSet)?;

        self.validate(key, first)?;

        Ok(0)
    }
}

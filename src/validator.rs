//! Record validation and selection, dispatched by key namespace.

mod envelope;
mod namespaced;
mod public_key;

use bytes::Bytes;

use crate::Result;

pub use envelope::{KeyType, PublicKeyEnvelope};
pub use namespaced::NamespacedValidator;
pub use public_key::{PublicKeyValidator, PUBLIC_KEY_NAMESPACE};

/// Validates records of one namespace, and picks the best of several
/// conflicting values for the same key.
///
/// Both operations must be deterministic, so that every peer reaches the
/// same decision given the same inputs.
pub trait Validator: Send + Sync {
    /// Return `Ok(())` if `value` is a well-formed value for `key`.
    fn validate(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Return the index of the value in `values` to trust.
    fn select(&self, key: &str, values: &[Bytes]) -> Result<usize>;
}

//! Registry of validators keyed by namespace.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::debug;

use crate::common::{split_key, Record};
use crate::validator::{PublicKeyValidator, Validator, PUBLIC_KEY_NAMESPACE};
use crate::{Error, Result};

/// Dispatches validation and selection to the validator registered for the
/// namespace of each key.
///
/// Registration is rare and takes a write lock, lookups share a read lock.
/// The `pk` namespace is served by a [PublicKeyValidator] unless overridden.
pub struct NamespacedValidator {
    validators: RwLock<HashMap<String, Arc<dyn Validator>>>,
}

impl NamespacedValidator {
    /// Create a registry with the default [PublicKeyValidator].
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.add_validator(PUBLIC_KEY_NAMESPACE, PublicKeyValidator::new());

        registry
    }

    /// Create a registry with no validators at all.
    pub fn empty() -> Self {
        Self {
            validators: RwLock::new(HashMap::new()),
        }
    }

    /// Register `validator` for `namespace`, replacing any existing one.
    pub fn add_validator(&self, namespace: impl Into<String>, validator: impl Validator + 'static) {
        let namespace = namespace.into();

        if self
            .validators
            .write()
            .insert(namespace.clone(), Arc::new(validator))
            .is_some()
        {
            debug!(?namespace, "Replaced namespace validator");
        } else {
            debug!(?namespace, "Added namespace validator");
        }
    }

    /// Returns the validator for the namespace of `key`, or `None` if the key
    /// is malformed or the namespace is not registered.
    pub fn validator_for(&self, key: &str) -> Option<Arc<dyn Validator>> {
        let (namespace, _) = split_key(key).ok()?;

        self.validators.read().get(namespace).cloned()
    }

    /// Returns the registered namespaces, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<String> = self.validators.read().keys().cloned().collect();
        namespaces.sort();

        namespaces
    }

    /// Validate a record with the validator of its namespace.
    pub fn validate(&self, key: &str, value: &[u8]) -> Result<()> {
        self.resolve_validator(key)?.validate(key, value)
    }

    /// Select the best of `values` with the validator of the key's namespace.
    ///
    /// A validator that panics, or returns an index out of bounds, fails with
    /// [Error::SelectionFailed].
    pub fn select(&self, key: &str, values: &[Bytes]) -> Result<usize> {
        select_with(self.resolve_validator(key)?.as_ref(), key, values)
    }

    /// Pick the record to trust out of the candidates fetched for `key`.
    ///
    /// Candidates for a different key, or whose value fails validation, are
    /// discarded. Fails with [Error::NoValidRecord] if none remain, and with
    /// [Error::SelectionFailed] if selection among the rest fails.
    ///
    /// The same validator instance validates and selects, even if the
    /// namespace is re-registered meanwhile.
    pub fn resolve(&self, key: &str, candidates: &[Record]) -> Result<Record> {
        let validator = self.resolve_validator(key)?;

        let valid: Vec<&Record> = candidates
            .iter()
            .filter(|record| {
                if record.key() != key {
                    debug!(?key, other = ?record.key(), "Discarding record for another key");
                    return false;
                }

                match validator.validate(key, record.value()) {
                    Ok(()) => true,
                    Err(error) => {
                        debug!(?key, ?error, author = ?record.author(), "Discarding invalid record");
                        false
                    }
                }
            })
            .collect();

        if valid.is_empty() {
            return Err(Error::NoValidRecord(format!(
                "none of {} candidates for {key} is valid",
                candidates.len()
            )));
        }

        let values: Vec<Bytes> = valid.iter().map(|record| record.value().clone()).collect();

        let index = select_with(validator.as_ref(), key, &values).map_err(|error| match error {
            Error::SelectionFailed(_) => error,
            error => Error::SelectionFailed(error.to_string()),
        })?;

        Ok(valid[index].clone())
    }

    // === Private Methods ===

    fn resolve_validator(&self, key: &str) -> Result<Arc<dyn Validator>> {
        let (namespace, _) = split_key(key)?;

        self.validators
            .read()
            .get(namespace)
            .cloned()
            .ok_or_else(|| Error::NoValidatorForNamespace(namespace.to_string()))
    }
}

/// Run `validator.select`, turning a panic or an out of bounds index into
/// [Error::SelectionFailed].
fn select_with(validator: &dyn Validator, key: &str, values: &[Bytes]) -> Result<usize> {
    let index = catch_unwind(AssertUnwindSafe(|| validator.select(key, values))).map_err(|panic| {
        let message = panic_message(panic.as_ref());
        debug!(?key, ?message, "Validator panicked during select");

        Error::SelectionFailed(message)
    })??;

    if index >= values.len() {
        return Err(Error::SelectionFailed(format!(
            "selected index {index} out of {} values",
            values.len()
        )));
    }

    Ok(index)
}

impl Default for NamespacedValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for NamespacedValidator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedValidator")
            .field("namespaces", &self.namespaces())
            .finish()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "validator panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts values of at least 5 bytes, and selects the longest.
    struct LongestValidator;

    impl Validator for LongestValidator {
        fn validate(&self, _key: &str, value: &[u8]) -> Result<()> {
            if value.len() < 5 {
                return Err(Error::InvalidRecordValue(
                    "value must be at least 5 bytes".to_string(),
                ));
            }

            Ok(())
        }

        fn select(&self, _key: &str, values: &[Bytes]) -> Result<usize> {
            values
                .iter()
                .enumerate()
                .rev()
                .max_by_key(|(_, value)| value.len())
                .map(|(index, _)| index)
                .ok_or(Error::EmptyCandidateSet)
        }
    }

    struct PanickingValidator;

    impl Validator for PanickingValidator {
        fn validate(&self, _key: &str, _value: &[u8]) -> Result<()> {
            Ok(())
        }

        fn select(&self, _key: &str, _values: &[Bytes]) -> Result<usize> {
            panic!("misbehaving validator")
        }
    }

    struct OutOfBoundsValidator;

    impl Validator for OutOfBoundsValidator {
        fn validate(&self, _key: &str, _value: &[u8]) -> Result<()> {
            Ok(())
        }

        fn select(&self, _key: &str, values: &[Bytes]) -> Result<usize> {
            Ok(values.len())
        }
    }

    fn values(values: &[&'static [u8]]) -> Vec<Bytes> {
        values.iter().map(|v| Bytes::from_static(v)).collect()
    }

    #[test]
    fn pk_is_registered_by_default() {
        let registry = NamespacedValidator::new();

        assert!(registry.validator_for("/pk/QmTest").is_some());
        assert_eq!(registry.namespaces(), vec!["pk".to_string()]);
        assert!(NamespacedValidator::empty().namespaces().is_empty());
    }

    #[test]
    fn validator_for_unknown_or_invalid() {
        let registry = NamespacedValidator::new();

        assert!(registry.validator_for("/unknown/test").is_none());
        assert!(registry.validator_for("invalid").is_none());
    }

    #[test]
    fn validate_unknown_namespace() {
        let registry = NamespacedValidator::new();

        match registry.validate("/unknown/test", b"value") {
            Err(Error::NoValidatorForNamespace(namespace)) => assert_eq!(namespace, "unknown"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validate_invalid_key() {
        let registry = NamespacedValidator::new();

        assert!(matches!(
            registry.validate("invalid", b"value"),
            Err(Error::InvalidKeyFormat(_))
        ));
        assert!(matches!(
            registry.select("invalid", &values(&[b"value"])),
            Err(Error::InvalidKeyFormat(_))
        ));
    }

    #[test]
    fn custom_validator() {
        let registry = NamespacedValidator::new();
        registry.add_validator("custom", LongestValidator);

        assert!(registry.validate("/custom/test", b"valid long value").is_ok());
        assert!(matches!(
            registry.validate("/custom/test", b"bad"),
            Err(Error::InvalidRecordValue(_))
        ));
    }

    #[test]
    fn select_longest() {
        let registry = NamespacedValidator::new();
        registry.add_validator("custom", LongestValidator);

        let candidates = values(&[
            b"short",
            b"this is a much longer value",
            b"medium length value",
        ]);
        let copy = candidates.clone();

        assert_eq!(registry.select("/custom/test", &candidates).unwrap(), 1);
        assert_eq!(registry.select("/custom/test", &candidates).unwrap(), 1);
        assert_eq!(candidates, copy);
    }

    #[test]
    fn replace_validator() {
        let registry = NamespacedValidator::new();
        registry.add_validator("pk", LongestValidator);

        assert!(registry.validate("/pk/anything", b"long enough").is_ok());
        assert_eq!(registry.namespaces(), vec!["pk".to_string()]);
    }

    #[test]
    fn select_errors_propagate() {
        let registry = NamespacedValidator::new();

        assert!(matches!(
            registry.select("/pk/QmTest", &[]),
            Err(Error::EmptyCandidateSet)
        ));
        assert!(matches!(
            registry.select("/unknown/test", &values(&[b"value"])),
            Err(Error::NoValidatorForNamespace(_))
        ));
    }

    #[test]
    fn panicking_select_is_contained() {
        let registry = NamespacedValidator::new();
        registry.add_validator("panic", PanickingValidator);

        match registry.select("/panic/test", &values(&[b"value"])) {
            Err(Error::SelectionFailed(message)) => assert_eq!(message, "misbehaving validator"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn out_of_bounds_select_fails() {
        let registry = NamespacedValidator::new();
        registry.add_validator("oob", OutOfBoundsValidator);

        assert!(matches!(
            registry.select("/oob/test", &values(&[b"value"])),
            Err(Error::SelectionFailed(_))
        ));
    }

    #[test]
    fn resolve_discards_invalid_candidates() {
        let registry = NamespacedValidator::new();
        registry.add_validator("custom", LongestValidator);

        let candidates = vec![
            Record::new("/custom/test", &b"bad"[..], None, None),
            Record::new("/custom/other", &b"the longest value of all"[..], None, None),
            Record::new("/custom/test", &b"valid value"[..], Some("bob".to_string()), None),
            Record::new("/custom/test", &b"valid longer value"[..], Some("alice".to_string()), None),
        ];

        let record = registry.resolve("/custom/test", &candidates).unwrap();

        assert_eq!(record, candidates[3]);
    }

    #[test]
    fn resolve_no_valid_record() {
        let registry = NamespacedValidator::new();
        registry.add_validator("custom", LongestValidator);

        let candidates = vec![Record::new("/custom/test", &b"bad"[..], None, None)];

        assert!(matches!(
            registry.resolve("/custom/test", &candidates),
            Err(Error::NoValidRecord(_))
        ));
        assert!(matches!(
            registry.resolve("/custom/test", &[]),
            Err(Error::NoValidRecord(_))
        ));
    }

    /// Validates by delegating, and on its first validation replaces its own
    /// namespace with a validator that always selects out of bounds.
    struct ReplacingValidator {
        registry: Arc<NamespacedValidator>,
    }

    impl Validator for ReplacingValidator {
        fn validate(&self, key: &str, value: &[u8]) -> Result<()> {
            self.registry.add_validator("swap", OutOfBoundsValidator);
            LongestValidator.validate(key, value)
        }

        fn select(&self, key: &str, values: &[Bytes]) -> Result<usize> {
            LongestValidator.select(key, values)
        }
    }

    #[test]
    fn resolve_selects_with_the_validating_validator() {
        let registry = Arc::new(NamespacedValidator::new());
        registry.add_validator(
            "swap",
            ReplacingValidator {
                registry: registry.clone(),
            },
        );

        let candidates = vec![
            Record::new("/swap/test", &b"short value"[..], None, None),
            Record::new("/swap/test", &b"much longer value"[..], None, None),
        ];

        assert_eq!(
            registry.resolve("/swap/test", &candidates).unwrap(),
            candidates[1]
        );

        // The replacement is in place for later calls.
        assert!(matches!(
            registry.select("/swap/test", &values(&[b"value"])),
            Err(Error::SelectionFailed(_))
        ));
    }

    #[test]
    fn resolve_selection_failed() {
        let registry = NamespacedValidator::new();
        registry.add_validator("panic", PanickingValidator);

        let candidates = vec![Record::new("/panic/test", &b"value"[..], None, None)];

        assert!(matches!(
            registry.resolve("/panic/test", &candidates),
            Err(Error::SelectionFailed(_))
        ));
    }
}

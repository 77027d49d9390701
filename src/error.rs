//! Main Crate Error

#[derive(thiserror::Error, Debug)]
/// Kadcore crate error enum.
///
/// Every failure of key parsing, validation or selection surfaces as one of
/// these kinds. Routing table mutations never fail.
pub enum Error {
    /// The record key is not of the form `/namespace/path`.
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// No validator is registered for the namespace of a key.
    #[error("No validator for namespace: {0}")]
    NoValidatorForNamespace(String),

    /// A validator was handed a key from a namespace it does not govern.
    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    /// A namespace validator rejected the value of a record.
    #[error("Invalid record value: {0}")]
    InvalidRecordValue(String),

    /// Identifier bytes or text could not be decoded.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The path of a public key record is not a valid multihash.
    #[error("Invalid multihash: {0}")]
    InvalidMultihash(String),

    /// The value of a public key record is not a valid public key.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("No values to select from")]
    EmptyCandidateSet,

    /// A validator failed to select among otherwise valid candidates.
    #[error("Selection failed: {0}")]
    SelectionFailed(String),

    /// Every candidate record for a key failed validation.
    #[error("No valid record: {0}")]
    NoValidRecord(String),

    /// `timeReceived` is not in `YYYY-MM-DDTHH:MM:SSZ` form.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Failed to parse record bytes: {0}")]
    BencodeError(#[from] serde_bencode::Error),
}

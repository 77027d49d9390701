//! Protobuf envelope of a serialized public key.

use ed25519_dalek::VerifyingKey;
use prost::Message;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum KeyType {
    Rsa = 0,
    Ed25519 = 1,
    Secp256k1 = 2,
    Ecdsa = 3,
}

#[derive(Clone, PartialEq, prost::Message)]
/// `PublicKey { required KeyType Type = 1; required bytes Data = 2; }`
pub struct PublicKeyEnvelope {
    #[prost(enumeration = "KeyType", required, tag = "1")]
    pub key_type: i32,
    #[prost(bytes = "vec", required, tag = "2")]
    pub data: Vec<u8>,
}

impl PublicKeyEnvelope {
    pub fn new(key_type: KeyType, data: Vec<u8>) -> Self {
        Self {
            key_type: key_type as i32,
            data,
        }
    }

    /// Decode and structurally check a serialized public key.
    ///
    /// The key type must be known and the key data non-empty. Ed25519 key
    /// data must also be a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let envelope = PublicKeyEnvelope::decode(bytes).map_err(|error| {
            Error::InvalidPublicKey(format!("failed to parse public key protobuf: {error}"))
        })?;

        let key_type = envelope.kind().ok_or_else(|| {
            Error::InvalidPublicKey(format!("unknown key type: {}", envelope.key_type))
        })?;

        if envelope.data.is_empty() {
            return Err(Error::InvalidPublicKey("empty key data".to_string()));
        }

        if key_type == KeyType::Ed25519 {
            VerifyingKey::try_from(envelope.data.as_slice()).map_err(|error| {
                Error::InvalidPublicKey(format!("invalid ed25519 public key: {error}"))
            })?;
        }

        Ok(envelope)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// The [KeyType], or `None` if the tag is not recognized.
    pub fn kind(&self) -> Option<KeyType> {
        KeyType::try_from(self.key_type).ok()
    }
}

//! Textual peer identity: a base58 encoded multihash.
use multihash::Multihash;
use sha2::{Digest, Sha256};
use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use crate::{Error, Result};

/// Multihash code of the identity hash function.
pub const IDENTITY_CODE: u64 = 0x00;
/// Multihash code of sha2-256.
pub const SHA2_256_CODE: u64 = 0x12;
/// Encoded public keys up to this length are inlined with the identity hash.
pub const MAX_INLINE_KEY_LENGTH: usize = 42;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identity of a peer, the bytes of a valid multihash.
pub struct PeerId(Box<[u8]>);

impl PeerId {
    /// Parse raw multihash bytes.
    ///
    /// Only identity and sha2-256 multihashes are accepted.
    pub fn from_bytes(bytes: &[u8]) -> Result<PeerId> {
        let multihash = Multihash::<64>::from_bytes(bytes)
            .map_err(|error| Error::InvalidIdentifier(format!("invalid multihash: {error}")))?;

        match multihash.code() {
            IDENTITY_CODE => {}
            SHA2_256_CODE if multihash.digest().len() == 32 => {}
            SHA2_256_CODE => {
                return Err(Error::InvalidIdentifier(format!(
                    "invalid sha2-256 digest length: {}",
                    multihash.digest().len()
                )))
            }
            code => {
                return Err(Error::InvalidIdentifier(format!(
                    "unknown multihash code: {code:#x}"
                )))
            }
        }

        Ok(PeerId(bytes.into()))
    }

    /// Decode the base58 text form.
    pub fn from_base58(s: &str) -> Result<PeerId> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|error| Error::InvalidIdentifier(format!("invalid base58: {error}")))?;

        PeerId::from_bytes(&bytes)
    }

    /// Peer id derived from a protobuf encoded public key envelope.
    ///
    /// Short keys are inlined with the identity hash, longer ones are hashed
    /// with sha2-256.
    pub fn from_public_key(encoded: &[u8]) -> Result<PeerId> {
        let multihash = if encoded.len() <= MAX_INLINE_KEY_LENGTH {
            Multihash::<64>::wrap(IDENTITY_CODE, encoded)
        } else {
            Multihash::<64>::wrap(SHA2_256_CODE, &Sha256::digest(encoded))
        }
        .map_err(|error| Error::InvalidPublicKey(error.to_string()))?;

        Ok(PeerId(multihash.to_bytes().into()))
    }

    /// The multihash this peer id was parsed from.
    pub fn multihash(&self) -> Result<Multihash<64>> {
        Multihash::<64>::from_bytes(&self.0)
            .map_err(|error| Error::InvalidIdentifier(error.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl FromStr for PeerId {
    type Err = Error;

    fn from_str(s: &str) -> Result<PeerId> {
        PeerId::from_base58(s)
    }
}

impl Display for PeerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl Debug for PeerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.to_base58())
    }
}

//! Kademlia routing key and the XOR distance between two of them.
use rand::Rng;
use sha2::{Digest, Sha256};
use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use crate::common::PeerId;
use crate::{Error, Result};

/// The size of routing keys in bytes.
pub const ID_SIZE: usize = 32;
pub const MAX_DISTANCE: u16 = ID_SIZE as u16 * 8;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
/// Kademlia routing key of a peer, or a lookup target.
///
/// Ordering is the natural byte ordering, used to break distance ties.
pub struct Id(pub [u8; ID_SIZE]);

impl Id {
    pub fn random() -> Id {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; ID_SIZE] = rng.gen();

        Id(random_bytes)
    }

    /// Create a new Id from some bytes. Returns Err if `bytes` is not of length
    /// [ID_SIZE].
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Id> {
        let bytes = bytes.as_ref();
        let bytes: [u8; ID_SIZE] = bytes.try_into().map_err(|_| {
            Error::InvalidIdentifier(format!(
                "expected {ID_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Id(bytes))
    }

    /// XOR distance between this Id and a target Id.
    ///
    /// Distance to self is all zeros.
    pub fn xor(&self, other: &Id) -> Distance {
        let mut result = [0_u8; ID_SIZE];

        for (i, byte) in result.iter_mut().enumerate() {
            *byte = self.0[i] ^ other.0[i];
        }

        Distance(result)
    }

    pub fn as_bytes(&self) -> &[u8; ID_SIZE] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl From<&PeerId> for Id {
    /// Routing key of a peer, the sha2-256 digest of its peer id bytes.
    fn from(peer_id: &PeerId) -> Self {
        Id(Sha256::digest(peer_id.as_bytes()).into())
    }
}

impl From<[u8; ID_SIZE]> for Id {
    fn from(bytes: [u8; ID_SIZE]) -> Self {
        Id(bytes)
    }
}

impl FromStr for Id {
    type Err = Error;

    fn from_str(s: &str) -> Result<Id> {
        if s.len() != ID_SIZE * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidIdentifier(format!(
                "expected {} hex characters",
                ID_SIZE * 2
            )));
        }

        let mut bytes = [0_u8; ID_SIZE];

        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| Error::InvalidIdentifier(format!("invalid hex: {s}")))?;
        }

        Ok(Id(bytes))
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

impl Debug for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Id({self})")
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
/// The XOR of two [Id]s, ordered as an unsigned big-endian integer.
pub struct Distance(pub [u8; ID_SIZE]);

impl Distance {
    /// Number of leading zero bits, i.e. the length of the prefix
    /// both ids share.
    ///
    /// Distance to self is [MAX_DISTANCE]
    pub fn leading_zeros(&self) -> u16 {
        for (i, byte) in self.0.iter().enumerate() {
            if *byte != 0 {
                return i as u16 * 8 + byte.leading_zeros() as u16;
            }
        }

        MAX_DISTANCE
    }

    pub fn as_bytes(&self) -> &[u8; ID_SIZE] {
        &self.0
    }
}

impl Debug for Distance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", Id(self.0))
    }
}

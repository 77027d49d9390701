//! Key/value records exchanged between peers.

mod internal;

use std::fmt::{self, Debug, Formatter};

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{Error, Result};

/// Text form of [Record::time_received].
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Clone)]
/// A record in the DHT.
///
/// Two records are equal if their key, value and author are equal,
/// regardless of their signature and time received, so re-putting the same
/// logical record is idempotent.
pub struct Record {
    key: String,
    value: Bytes,
    author: Option<String>,
    signature: Option<Bytes>,
    time_received: DateTime<Utc>,
}

impl Record {
    /// Create a new record to put into the network, stamped with the current time.
    ///
    /// Does not validate the key or value, see [crate::NamespacedValidator::validate].
    pub fn new(
        key: impl Into<String>,
        value: impl Into<Bytes>,
        author: Option<String>,
        signature: Option<Bytes>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            author,
            signature,
            time_received: Utc::now(),
        }
    }

    // === Getters ===

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn signature(&self) -> Option<&Bytes> {
        self.signature.as_ref()
    }

    /// Unix timestamp in seconds of when this record was created or received.
    pub fn timestamp(&self) -> i64 {
        self.time_received.timestamp()
    }

    /// The time this record was created or received, as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn time_received(&self) -> String {
        self.time_received.format(TIME_FORMAT).to_string()
    }

    // === Wire ===

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(internal::RecordMessage::from(self).to_bytes()?)
    }

    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Record> {
        Record::try_from(internal::RecordMessage::from_bytes(bytes.as_ref())?)
    }
}

/// Create a new [Record] for putting into the network.
pub fn make_put_record(
    key: impl Into<String>,
    value: impl Into<Bytes>,
    author: Option<String>,
    signature: Option<Bytes>,
) -> Record {
    Record::new(key, value, author, signature)
}

pub(crate) fn parse_time(s: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map(|time| time.and_utc())
        .map_err(|error| Error::InvalidTimestamp(format!("{s}: {error}")))
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value && self.author == other.author
    }
}

impl Eq for Record {}

impl Debug for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("key", &self.key)
            .field("value_len", &self.value.len())
            .field("author", &self.author)
            .finish()
    }
}

impl From<&Record> for internal::RecordMessage {
    fn from(record: &Record) -> Self {
        Self {
            key: record.key.clone(),
            value: record.value.to_vec(),
            author: record.author.clone(),
            signature: record.signature.as_ref().map(|s| s.to_vec()),
            time_received: Some(record.time_received()),
        }
    }
}

impl TryFrom<internal::RecordMessage> for Record {
    type Error = Error;

    fn try_from(message: internal::RecordMessage) -> Result<Self> {
        let time_received = match message.time_received {
            Some(time) => parse_time(&time)?,
            None => Utc::now(),
        };

        Ok(Self {
            key: message.key,
            value: message.value.into(),
            author: message.author,
            signature: message.signature.map(Bytes::from),
            time_received,
        })
    }
}

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordMessage {
    pub key: String,

    #[serde(with = "serde_bytes")]
    pub value: Vec<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "serde_bytes")]
    pub signature: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "timeReceived")]
    pub time_received: Option<String>,
}

impl RecordMessage {
    pub fn from_bytes(bytes: &[u8]) -> Result<RecordMessage, serde_bencode::Error> {
        let obj = serde_bencode::from_bytes(bytes)?;
        Ok(obj)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_bencode::Error> {
        serde_bencode::to_bytes(self)
    }
}

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// A cross-tab change signal: the storage key that changed plus a binary
/// payload describing the change.
///
/// The payload is bitcode on the wire; when a signal itself has to travel
/// through a textual transport it serializes with the payload base64-coded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub key: String,
    #[serde(with = "payload_serde")]
    pub payload: Vec<u8>,
}

mod payload_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(payload: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(payload).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl Signal {
    /// Build a signal with a bitcode-encoded payload.
    pub fn encode<T: Serialize>(key: impl Into<String>, payload: &T) -> Result<Self, SyncError> {
        let payload = bitcode::serialize(payload)
            .map_err(|err| SyncError::Serialization(err.to_string()))?;
        Ok(Self {
            key: key.into(),
            payload,
        })
    }

    /// Decode the payload back out.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, SyncError> {
        bitcode::deserialize(&self.payload)
            .map_err(|err| SyncError::Serialization(err.to_string()))
    }
}

/// Payload announcing that a match's cached snapshot changed.
///
/// Carries the version so a receiver can decide staleness before it does
/// a cache read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotice {
    pub match_id: String,
    pub version: u64,
}

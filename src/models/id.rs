//! Store-assigned document identifiers.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier assigned by the document store on insert.
///
/// Travels over HTTP as the 24-character hex form of the underlying `ObjectId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for DocumentId {
    type Err = bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_match() {
        let raw = "65f1c0ffee0000000000abcd";
        let id: DocumentId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_rejects_non_hex() {
        assert!("not-an-object-id".parse::<DocumentId>().is_err());
        assert!("".parse::<DocumentId>().is_err());
        assert!("65f1c0ffee".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_rejects_padded_id() {
        assert!(" 65f1c0ffee0000000000abcd".parse::<DocumentId>().is_err());
        assert!("65f1c0ffee0000000000abcd ".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = DocumentId::generate();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));

        let back: DocumentId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }
}

use std::fmt;

use serde::{
    de::{self, Deserializer, Visitor},
    Deserialize, Serialize, Serializer,
};

use crate::Ulid;

impl Serialize for Ulid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            let mut buffer = [0; 26];
            serializer.serialize_str(self.encode(&mut buffer))
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Ulid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct UlidVisitor;

        impl<'de> Visitor<'de> for UlidVisitor {
            type Value = Ulid;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a ULID string or 16 bytes")
            }
            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(de::Error::custom)
            }
            fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ulid::try_from(value).map_err(|_| de::Error::invalid_length(value.len(), &self))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(UlidVisitor)
        } else {
            deserializer.deserialize_bytes(UlidVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_derive::{Deserialize, Serialize};

    use crate::{Ulid, ZeroEntropy};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Record {
        id: Ulid,
    }

    #[test]
    fn test_json() {
        let record = Record {
            id: Ulid::new(1_000_000_000_000, &mut ZeroEntropy).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"00X3AAA4000000000000000000"}"#);

        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_json_lenient_and_invalid() {
        let parsed: Record = serde_json::from_str(r#"{"id":"oox3aaa4000000000000000000"}"#).unwrap();
        assert_eq!(parsed.id.timestamp(), 1_000_000_000_000);

        assert!(serde_json::from_str::<Record>(r#"{"id":"00X3AAA400000000000000000U"}"#).is_err());
        assert!(serde_json::from_str::<Record>(r#"{"id":"00X3AAA4"}"#).is_err());
    }
}

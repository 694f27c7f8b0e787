use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::SerializerError;
use super::serializable::Payload;

pub const CLASS_KEY: &str = "class";
pub const PAYLOAD_KEY: &str = "payload";

// ============================================================================
// Envelope - transport structure for serialized objects
// ============================================================================
//
// Mapping form: { "class": <string>, "payload": <mapping> }
//
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Envelope {
    pub class: String,
    pub payload: Payload,
}

impl Envelope {
    pub fn new(class: impl Into<String>, payload: Payload) -> Self {
        Self {
            class: class.into(),
            payload,
        }
    }

    /// Mapping form of the envelope
    pub fn into_value(self) -> Value {
        let mut map = Map::new();
        map.insert(CLASS_KEY.to_string(), Value::String(self.class));
        map.insert(PAYLOAD_KEY.to_string(), Value::Object(self.payload));
        Value::Object(map)
    }

    /// Validate a mapping and read it as an envelope.
    ///
    /// Checks run in a fixed order: mapping, `class` present, `payload`
    /// present, then the value types. With `strict`, keys other than
    /// `class` and `payload` are rejected as well.
    pub fn parse(data: &Value, strict: bool) -> Result<Self, SerializerError> {
        let map = data.as_object().ok_or(SerializerError::NotAMapping)?;

        let class = map
            .get(CLASS_KEY)
            .ok_or(SerializerError::MissingKey(CLASS_KEY))?;
        let payload = map
            .get(PAYLOAD_KEY)
            .ok_or(SerializerError::MissingKey(PAYLOAD_KEY))?;

        let class = class.as_str().ok_or(SerializerError::InvalidKey {
            key: CLASS_KEY,
            expected: "a string",
        })?;
        let payload = payload.as_object().ok_or(SerializerError::InvalidKey {
            key: PAYLOAD_KEY,
            expected: "a mapping",
        })?;

        if strict {
            if let Some(extra) = map.keys().find(|k| k.as_str() != CLASS_KEY && k.as_str() != PAYLOAD_KEY) {
                return Err(SerializerError::UnexpectedKey(extra.clone()));
            }
        }

        Ok(Self::new(class, payload.clone()))
    }
}

impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Self {
        envelope.into_value()
    }
}

impl TryFrom<Value> for Envelope {
    type Error = SerializerError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Envelope::parse(&value, false)
    }
}

// ============================================================================
// Tests
// ============================================================================

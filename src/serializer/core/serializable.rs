use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;

use super::error::SerializerError;

// ============================================================================
// Serializable Capability
// ============================================================================
//
// A type is serializable when it can turn itself into a payload mapping and
// be rebuilt from that mapping. The class name is what an envelope carries to
// find the type again.
//
// ============================================================================

/// Serialized state of an object: field name -> value
pub type Payload = Map<String, Value>;

/// Capability contract for objects handled by the serializer
///
/// `Debug` is required because deserialized objects are handed back as
/// `Box<dyn SerializableObject>`, which must stay printable in errors and logs.
pub trait Serializable: Any + Send + Sync + fmt::Debug {
    /// Stable identifier written into the envelope's `class` key.
    ///
    /// Defaults to the fully-qualified type path. Override it when the type
    /// may move between modules but its envelopes must stay readable.
    fn class_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    fn serialize(&self) -> Result<Payload, SerializerError>;

    fn deserialize(payload: &Payload) -> Result<Self, SerializerError>
    where
        Self: Sized;
}

// ============================================================================
// Type-erased view
// ============================================================================

/// Object-safe view over any [`Serializable`] value
///
/// Returned by deserialization, since the concrete type is only known at
/// runtime through the envelope's class.
pub trait SerializableObject: Any + Send + Sync + fmt::Debug {
    fn class(&self) -> &'static str;
    /// Rust type path of the concrete object
    fn type_name(&self) -> &'static str;
    fn payload(&self) -> Result<Payload, SerializerError>;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Serializable> SerializableObject for T {
    fn class(&self) -> &'static str {
        T::class_name()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn payload(&self) -> Result<Payload, SerializerError> {
        Serializable::serialize(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

impl dyn SerializableObject {
    pub fn is<T: Serializable>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast<T: Serializable>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

// ============================================================================
// Payload Helpers (serde-backed)
// ============================================================================

/// Serialize any serde value into a payload mapping
pub fn to_payload<T: Serialize>(value: &T) -> Result<Payload, SerializerError> {
    let class = std::any::type_name::<T>();
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(SerializerError::invalid_payload(
            class,
            format!("expected a mapping, got {}", value_kind(&other)),
        )),
        Err(e) => Err(SerializerError::invalid_payload(class, e)),
    }
}

/// Rebuild a serde value from a payload mapping
pub fn from_payload<T: DeserializeOwned>(class: &str, payload: &Payload) -> Result<T, SerializerError> {
    serde_json::from_value(Value::Object(payload.clone()))
        .map_err(|e| SerializerError::invalid_payload(class, e))
}

/// Read one required field out of a payload
pub fn payload_field<T: DeserializeOwned>(
    class: &str,
    payload: &Payload,
    key: &str,
) -> Result<T, SerializerError> {
    let value = payload
        .get(key)
        .ok_or_else(|| SerializerError::invalid_payload(class, format!("missing field '{}'", key)))?;

    serde_json::from_value(value.clone())
        .map_err(|e| SerializerError::invalid_payload(class, format!("field '{}': {}", key, e)))
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

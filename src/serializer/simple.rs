use serde_json::Value;
use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::serializer::config::SerializerConfig;
use crate::serializer::core::{Envelope, Serializable, SerializableObject, SerializerError};
use crate::serializer::registry::TypeRegistry;

// ============================================================================
// Serializer - common interface
// ============================================================================

/// Object-safe serializer interface, so callers can hold `Arc<dyn Serializer>`
pub trait Serializer: Send + Sync {
    fn serialize_object(&self, object: &dyn SerializableObject) -> Result<Envelope, SerializerError>;

    fn deserialize(&self, data: &Value) -> Result<Box<dyn SerializableObject>, SerializerError>;
}

// ============================================================================
// Simple Serializer
// ============================================================================
//
// Turns registered `Serializable` objects into `{class, payload}` envelopes
// and back. Holds no mutable state: the registry is shared read-only, so a
// single instance can be cloned and used from any number of threads.
//
// ============================================================================

#[derive(Clone, Debug)]
pub struct SimpleSerializer {
    registry: Arc<TypeRegistry>,
    config: SerializerConfig,
}

impl SimpleSerializer {
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, SerializerConfig::default())
    }

    pub fn with_config(registry: TypeRegistry, config: SerializerConfig) -> Self {
        Self::from_shared(Arc::new(registry), config)
    }

    pub fn from_shared(registry: Arc<TypeRegistry>, config: SerializerConfig) -> Self {
        tracing::info!(
            classes = registry.len(),
            strict_envelope = config.strict_envelope,
            "Serializer ready"
        );
        Self { registry, config }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Serialize any value into an envelope.
    ///
    /// Only values whose type was registered as `Serializable` are accepted,
    /// directly or behind a `Box`/`Arc` (including the boxed objects that
    /// `deserialize` returns). Everything else fails with `NotSerializable`
    /// naming the value's type.
    pub fn serialize<T: Any>(&self, object: &T) -> Result<Envelope, SerializerError> {
        let erased: &dyn Any = object;
        if let Some(boxed) = erased.downcast_ref::<Box<dyn SerializableObject>>() {
            return self.serialize_object(&**boxed);
        }
        if let Some(shared) = erased.downcast_ref::<Arc<dyn SerializableObject>>() {
            return self.serialize_object(&**shared);
        }

        let type_name = std::any::type_name::<T>();
        let not_serializable = || SerializerError::NotSerializable(type_name.to_string());

        let binding = self
            .registry
            .binding_for(TypeId::of::<T>())
            .ok_or_else(not_serializable)?;

        let payload = (binding.serialize)(erased).ok_or_else(not_serializable)??;

        tracing::debug!(class = %binding.class, fields = payload.len(), "Serialized object");

        Ok(Envelope::new(binding.class, payload))
    }

    /// Serialize an object whose concrete type is only known at runtime
    pub fn serialize_object(&self, object: &dyn SerializableObject) -> Result<Envelope, SerializerError> {
        let class = object.class();
        let registration = self
            .registry
            .resolve(class)
            .ok_or_else(|| SerializerError::UnknownClass(class.to_string()))?;

        if registration.type_id != object.as_any().type_id() {
            return Err(SerializerError::TypeMismatch {
                class: class.to_string(),
                expected: registration.type_name,
                found: object.type_name(),
            });
        }

        let payload = object.payload()?;

        tracing::debug!(class = %class, fields = payload.len(), "Serialized object");

        Ok(Envelope::new(class, payload))
    }

    /// Rebuild an object from an envelope mapping
    pub fn deserialize(&self, data: &Value) -> Result<Box<dyn SerializableObject>, SerializerError> {
        let envelope = Envelope::parse(data, self.config.strict_envelope).map_err(|e| {
            tracing::warn!(error = %e, "Rejected envelope");
            e
        })?;

        self.deserialize_envelope(&envelope)
    }

    /// Rebuild an object from an already-typed envelope
    pub fn deserialize_envelope(&self, envelope: &Envelope) -> Result<Box<dyn SerializableObject>, SerializerError> {
        let registration = self.registry.resolve(&envelope.class).ok_or_else(|| {
            tracing::warn!(class = %envelope.class, "Envelope class is not registered");
            SerializerError::UnknownClass(envelope.class.clone())
        })?;

        let object = (registration.deserialize)(&envelope.payload)?;

        tracing::debug!(class = %registration.class, "Deserialized object");

        Ok(object)
    }

    /// Rebuild an object and check that it is a `T`
    pub fn deserialize_as<T: Serializable>(&self, data: &Value) -> Result<T, SerializerError> {
        let object = self.deserialize(data)?;
        let class = object.class();
        let found = object.type_name();

        object
            .downcast::<T>()
            .map(|boxed| *boxed)
            .ok_or_else(|| SerializerError::TypeMismatch {
                class: class.to_string(),
                expected: std::any::type_name::<T>(),
                found,
            })
    }
}

impl Serializer for SimpleSerializer {
    fn serialize_object(&self, object: &dyn SerializableObject) -> Result<Envelope, SerializerError> {
        SimpleSerializer::serialize_object(self, object)
    }

    fn deserialize(&self, data: &Value) -> Result<Box<dyn SerializableObject>, SerializerError> {
        SimpleSerializer::deserialize(self, data)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::core::{payload_field, ErrorKind, Payload};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct TestSerializable {
        foo: Value,
    }

    impl TestSerializable {
        fn new(foo: impl Into<Value>) -> Self {
            Self { foo: foo.into() }
        }
    }

    impl Serializable for TestSerializable {
        fn serialize(&self) -> Result<Payload, SerializerError> {
            let mut payload = Payload::new();
            payload.insert("foo".to_string(), self.foo.clone());
            Ok(payload)
        }

        fn deserialize(payload: &Payload) -> Result<Self, SerializerError> {
            Ok(Self {
                foo: payload_field(Self::class_name(), payload, "foo")?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Other;

    impl Serializable for Other {
        fn class_name() -> &'static str {
            "test.other"
        }

        fn serialize(&self) -> Result<Payload, SerializerError> {
            Ok(Payload::new())
        }

        fn deserialize(_payload: &Payload) -> Result<Self, SerializerError> {
            Ok(Other)
        }
    }

    #[derive(Debug)]
    struct Unregistered;

    impl Serializable for Unregistered {
        fn serialize(&self) -> Result<Payload, SerializerError> {
            Ok(Payload::new())
        }

        fn deserialize(_payload: &Payload) -> Result<Self, SerializerError> {
            Ok(Unregistered)
        }
    }

    fn serializer() -> SimpleSerializer {
        let mut registry = TypeRegistry::new();
        registry
            .register::<TestSerializable>()
            .unwrap()
            .register::<Other>()
            .unwrap();
        SimpleSerializer::new(registry)
    }

    fn class() -> &'static str {
        TestSerializable::class_name()
    }

    fn assert_not_serializable<T: Any>(value: T) {
        let err = serializer().serialize(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(
            err.to_string(),
            format!(
                "Object '{}' does not implement Serializable",
                std::any::type_name::<T>()
            )
        );
    }

    #[test]
    fn test_throws_if_object_is_not_serializable() {
        #[derive(Debug)]
        struct PlainObject;

        let err = serializer().serialize(&PlainObject).unwrap_err();

        assert!(err.is_serialization());
        assert!(err.to_string().ends_with("::PlainObject' does not implement Serializable"));
    }

    #[test]
    fn test_fails_to_serialize_non_conforming_values() {
        assert_not_serializable(Option::<()>::None);
        assert_not_serializable(());
        assert_not_serializable(0i32);
        assert_not_serializable(3.14f64);
        assert_not_serializable("impossible");
        assert_not_serializable(Vec::<Value>::new());
        assert_not_serializable(json!({}));
        assert_not_serializable(json!({"class": "foo", "payload": "bar"}));
    }

    #[test]
    fn test_fails_to_serialize_unregistered_serializable() {
        let err = serializer().serialize(&Unregistered).unwrap_err();
        assert!(matches!(err, SerializerError::NotSerializable(_)));
    }

    #[test]
    fn test_throws_if_class_not_set_in_data() {
        let err = serializer().deserialize(&json!({"payload": {}})).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Key 'class' should be set");
    }

    #[test]
    fn test_throws_if_payload_not_set_in_data() {
        let err = serializer().deserialize(&json!({"class": "SomeClass"})).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Key 'payload' should be set");
    }

    #[test]
    fn test_serializes_objects_implementing_serializable() {
        let envelope = serializer().serialize(&TestSerializable::new("bar")).unwrap();

        assert_eq!(
            envelope.into_value(),
            json!({"class": class(), "payload": {"foo": "bar"}})
        );
        assert!(class().ends_with("::TestSerializable"));
    }

    #[test]
    fn test_deserializes_classes_implementing_serializable() {
        let data = json!({"class": class(), "payload": {"foo": "bar"}});

        let object = serializer().deserialize(&data).unwrap();

        assert_eq!(
            object.downcast_ref::<TestSerializable>(),
            Some(&TestSerializable::new("bar"))
        );
    }

    #[test]
    fn test_can_deserialize_classes_it_has_serialized() {
        let serializer = serializer();
        let object = TestSerializable::new("bar");

        let serialized = serializer.serialize(&object).unwrap().into_value();
        let deserialized: TestSerializable = serializer.deserialize_as(&serialized).unwrap();

        assert_eq!(deserialized, object);
    }

    #[test]
    fn test_round_trips_varied_field_values() {
        let serializer = serializer();
        let values = vec![
            Value::Null,
            json!(0),
            json!(3.14),
            json!("impossible"),
            json!([]),
            json!({}),
            json!({"class": "foo", "payload": "bar"}),
        ];

        for value in values {
            let object = TestSerializable::new(value);
            let serialized = serializer.serialize(&object).unwrap().into_value();
            let deserialized = serializer.deserialize(&serialized).unwrap();

            assert!(deserialized.is::<TestSerializable>());
            assert_eq!(deserialized.downcast_ref::<TestSerializable>(), Some(&object));
        }
    }

    #[test]
    fn test_serialize_deserialize_serialize_is_stable() {
        let serializer = serializer();
        let object = TestSerializable::new(json!({"nested": [1, 2, 3]}));

        let first = serializer.serialize(&object).unwrap();
        let rebuilt = serializer.deserialize(&first.clone().into_value()).unwrap();
        let second = serializer.serialize(&rebuilt).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_serializes_objects_behind_owning_pointers() {
        let serializer = serializer();
        let expected = serializer.serialize(&TestSerializable::new("bar")).unwrap();

        let boxed = Box::new(TestSerializable::new("bar"));
        assert_eq!(serializer.serialize(&boxed).unwrap(), expected);

        let shared = Arc::new(TestSerializable::new("bar"));
        assert_eq!(serializer.serialize(&shared).unwrap(), expected);

        let erased: Arc<dyn SerializableObject> = Arc::new(TestSerializable::new("bar"));
        assert_eq!(serializer.serialize(&erased).unwrap(), expected);

        let err = serializer.serialize(&Box::new(Unregistered)).unwrap_err();
        assert!(matches!(err, SerializerError::NotSerializable(_)));
    }

    #[test]
    fn test_erased_unregistered_object_is_unknown_class() {
        let erased: Box<dyn SerializableObject> = Box::new(Unregistered);
        let err = serializer().serialize(&erased).unwrap_err();
        assert_eq!(err, SerializerError::UnknownClass(Unregistered::class_name().to_string()));
    }

    #[test]
    fn test_unknown_class_is_a_serialization_error() {
        let err = serializer()
            .deserialize(&json!({"class": "does.not.Exist", "payload": {}}))
            .unwrap_err();

        assert_eq!(err, SerializerError::UnknownClass("does.not.Exist".to_string()));
        assert!(err.is_serialization());
    }

    #[test]
    fn test_invalid_payload_propagates() {
        let err = serializer()
            .deserialize(&json!({"class": class(), "payload": {}}))
            .unwrap_err();

        assert!(matches!(err, SerializerError::InvalidPayload { .. }));
        assert!(err.to_string().contains("missing field 'foo'"));
    }

    #[test]
    fn test_deserialize_as_wrong_type() {
        let err = serializer()
            .deserialize_as::<TestSerializable>(&json!({"class": "test.other", "payload": {}}))
            .unwrap_err();

        assert_eq!(
            err,
            SerializerError::TypeMismatch {
                class: "test.other".to_string(),
                expected: std::any::type_name::<TestSerializable>(),
                found: std::any::type_name::<Other>(),
            }
        );
    }

    #[test]
    fn test_serialize_object_requires_registration() {
        let serializer = serializer();

        let other: Box<dyn SerializableObject> = Box::new(Other);
        let envelope = serializer.serialize_object(other.as_ref()).unwrap();
        assert_eq!(envelope, Envelope::new("test.other", Payload::new()));

        let err = serializer.serialize_object(&Unregistered).unwrap_err();
        assert_eq!(err, SerializerError::UnknownClass(Unregistered::class_name().to_string()));
    }

    #[test]
    fn test_serialize_object_rejects_type_borrowing_a_registered_class() {
        // Claims the class of `Other` without being registered under it
        #[derive(Debug)]
        struct Impostor;

        impl Serializable for Impostor {
            fn class_name() -> &'static str {
                "test.other"
            }

            fn serialize(&self) -> Result<Payload, SerializerError> {
                Ok(Payload::new())
            }

            fn deserialize(_payload: &Payload) -> Result<Self, SerializerError> {
                Ok(Impostor)
            }
        }

        let err = serializer().serialize_object(&Impostor).unwrap_err();

        assert!(err.is_serialization());
        assert_eq!(
            err,
            SerializerError::TypeMismatch {
                class: "test.other".to_string(),
                expected: std::any::type_name::<Other>(),
                found: std::any::type_name::<Impostor>(),
            }
        );
        assert!(err.to_string().ends_with("::Impostor'"));

        // Not registered by TypeId either
        assert!(matches!(
            serializer().serialize(&Impostor).unwrap_err(),
            SerializerError::NotSerializable(_)
        ));
    }

    #[test]
    fn test_strict_config_rejects_extra_keys() {
        let mut registry = TypeRegistry::new();
        registry.register::<TestSerializable>().unwrap();
        let serializer = SimpleSerializer::with_config(registry, SerializerConfig::strict());

        let data = json!({"class": class(), "payload": {"foo": "bar"}, "meta": {}});
        let err = serializer.deserialize(&data).unwrap_err();
        assert_eq!(err, SerializerError::UnexpectedKey("meta".to_string()));

        assert!(self::serializer().deserialize(&data).is_ok());
    }

    #[test]
    fn test_usable_through_trait_object() {
        let serializer: Arc<dyn Serializer> = Arc::new(serializer());

        let envelope = serializer.serialize_object(&TestSerializable::new("bar")).unwrap();
        let object = serializer.deserialize(&envelope.into_value()).unwrap();

        assert_eq!(
            object.downcast_ref::<TestSerializable>(),
            Some(&TestSerializable::new("bar"))
        );
    }

    #[tokio::test]
    async fn test_concurrent_use_from_tasks() {
        let serializer = serializer();

        let handles: Vec<_> = (0..16i64)
            .map(|i| {
                let serializer = serializer.clone();
                tokio::spawn(async move {
                    let object = TestSerializable::new(i);
                    let envelope = serializer.serialize(&object).unwrap().into_value();
                    let rebuilt: TestSerializable = serializer.deserialize_as(&envelope).unwrap();
                    assert_eq!(rebuilt, object);
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    }
}

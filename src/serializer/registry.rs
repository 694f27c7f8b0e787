use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::serializer::core::{Payload, Serializable, SerializableObject, SerializerError};

// ============================================================================
// Type Registry - class name -> factory
// ============================================================================
//
// Types are resolved from the envelope's class through an explicit registry
// populated at startup. Nothing is discovered at runtime: a class that was
// never registered cannot be serialized or deserialized.
//
// The registry is append-only. Once handed to a serializer it is shared
// behind an `Arc` and never mutated again.
//
// ============================================================================

type SerializeFn = fn(&dyn Any) -> Option<Result<Payload, SerializerError>>;
type DeserializeFn = fn(&Payload) -> Result<Box<dyn SerializableObject>, SerializerError>;

#[derive(Clone, Copy)]
pub(crate) struct Registration {
    pub(crate) class: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) deserialize: DeserializeFn,
}

/// How a concrete Rust type (the serializable type itself or an owning
/// wrapper around it) turns into a payload
#[derive(Clone, Copy)]
pub(crate) struct TypeBinding {
    pub(crate) class: &'static str,
    pub(crate) serialize: SerializeFn,
}

fn serialize_erased<T: Serializable>(object: &dyn Any) -> Option<Result<Payload, SerializerError>> {
    object.downcast_ref::<T>().map(<T as Serializable>::serialize)
}

fn serialize_boxed<T: Serializable>(object: &dyn Any) -> Option<Result<Payload, SerializerError>> {
    object.downcast_ref::<Box<T>>().map(|boxed| <T as Serializable>::serialize(boxed))
}

fn serialize_shared<T: Serializable>(object: &dyn Any) -> Option<Result<Payload, SerializerError>> {
    object.downcast_ref::<Arc<T>>().map(|shared| <T as Serializable>::serialize(shared))
}

fn deserialize_boxed<T: Serializable>(payload: &Payload) -> Result<Box<dyn SerializableObject>, SerializerError> {
    let object = <T as Serializable>::deserialize(payload)?;
    Ok(Box::new(object))
}

#[derive(Default)]
pub struct TypeRegistry {
    by_class: HashMap<&'static str, Registration>,
    by_type: HashMap<TypeId, TypeBinding>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its class name
    ///
    /// Registering the same type twice is a no-op. Registering a different
    /// type under a class that is already taken fails.
    pub fn register<T: Serializable>(&mut self) -> Result<&mut Self, SerializerError> {
        let class = T::class_name();
        let type_id = TypeId::of::<T>();

        if let Some(existing) = self.by_class.get(class) {
            if existing.type_id == type_id {
                return Ok(self);
            }
            return Err(SerializerError::DuplicateClass {
                class: class.to_string(),
                existing: existing.type_name,
            });
        }

        self.by_class.insert(
            class,
            Registration {
                class,
                type_id,
                type_name: std::any::type_name::<T>(),
                deserialize: deserialize_boxed::<T>,
            },
        );

        // `Box<T>` and `Arc<T>` serialize as the `T` they own
        let bindings: [(TypeId, SerializeFn); 3] = [
            (type_id, serialize_erased::<T>),
            (TypeId::of::<Box<T>>(), serialize_boxed::<T>),
            (TypeId::of::<Arc<T>>(), serialize_shared::<T>),
        ];
        for (id, serialize) in bindings {
            self.by_type.insert(id, TypeBinding { class, serialize });
        }

        tracing::debug!(class = %class, type_name = std::any::type_name::<T>(), "Registered serializable type");

        Ok(self)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.by_class.contains_key(class)
    }

    /// Class under which `T` was registered, if any
    pub fn class_of<T: Any>(&self) -> Option<&'static str> {
        self.by_type.get(&TypeId::of::<T>()).map(|binding| binding.class)
    }

    /// Registered classes, sorted
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes: Vec<_> = self.by_class.keys().copied().collect();
        classes.sort_unstable();
        classes
    }

    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }

    pub(crate) fn resolve(&self, class: &str) -> Option<&Registration> {
        self.by_class.get(class)
    }

    pub(crate) fn binding_for(&self, type_id: TypeId) -> Option<&TypeBinding> {
        self.by_type.get(&type_id)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("classes", &self.classes())
            .finish()
    }
}

// ============================================================================
// Serializer Errors
// ============================================================================
//
// Two kinds of failure exist: a malformed argument (bad envelope, bad
// registration) and a serialization failure (object or class that cannot be
// handled). Every variant maps to exactly one kind.
//
// ============================================================================

/// Coarse classification of a [`SerializerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Serialization,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SerializerError {
    #[error("Key '{0}' should be set")]
    MissingKey(&'static str),

    #[error("Key '{key}' should be {expected}")]
    InvalidKey {
        key: &'static str,
        expected: &'static str,
    },

    #[error("Key '{0}' is not allowed")]
    UnexpectedKey(String),

    #[error("Envelope should be a mapping")]
    NotAMapping,

    #[error("Class '{class}' is already registered for '{existing}'")]
    DuplicateClass {
        class: String,
        existing: &'static str,
    },

    #[error("Object '{0}' does not implement Serializable")]
    NotSerializable(String),

    #[error("Class '{0}' is not registered as Serializable")]
    UnknownClass(String),

    #[error("Class '{class}' expected type '{expected}', found '{found}'")]
    TypeMismatch {
        class: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid payload for class '{class}': {reason}")]
    InvalidPayload { class: String, reason: String },
}

impl SerializerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SerializerError::MissingKey(_)
            | SerializerError::InvalidKey { .. }
            | SerializerError::UnexpectedKey(_)
            | SerializerError::NotAMapping
            | SerializerError::DuplicateClass { .. } => ErrorKind::InvalidArgument,
            SerializerError::NotSerializable(_)
            | SerializerError::UnknownClass(_)
            | SerializerError::TypeMismatch { .. }
            | SerializerError::InvalidPayload { .. } => ErrorKind::Serialization,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_serialization(&self) -> bool {
        self.kind() == ErrorKind::Serialization
    }

    pub(crate) fn invalid_payload(class: impl Into<String>, reason: impl ToString) -> Self {
        SerializerError::InvalidPayload {
            class: class.into(),
            reason: reason.to_string(),
        }
    }
}

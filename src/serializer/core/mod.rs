// ============================================================================
// Serializer Core - capability, envelope and error types
// ============================================================================
//
// Nothing here knows about concrete domain types. Domain code implements
// `Serializable`; the registry and serializer only see the trait.
//
// ============================================================================

pub mod envelope;
pub mod error;
pub mod serializable;

pub use envelope::{Envelope, CLASS_KEY, PAYLOAD_KEY};
pub use error::{ErrorKind, SerializerError};
pub use serializable::{from_payload, payload_field, to_payload, Payload, Serializable, SerializableObject};

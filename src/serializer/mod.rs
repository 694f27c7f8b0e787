// ============================================================================
// Serializer Infrastructure
// ============================================================================
//
// Generic object <-> envelope serialization for event-sourced domain types.
// Domain-specific types live in src/domain/ and only implement `Serializable`.
//
// ============================================================================

// Core abstractions (capability, envelope, errors)
mod core;
mod config;
mod registry;
mod simple;

pub use self::core::*;
pub use config::SerializerConfig;
pub use registry::TypeRegistry;
pub use simple::{Serializer, SimpleSerializer};

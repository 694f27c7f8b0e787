// ============================================================================
// Domain Layer - serializable event types
// ============================================================================
//
// Concrete types that travel through the serializer. Each aggregate has its
// own subdirectory and a helper that registers its events.
//
// ============================================================================

pub mod order;

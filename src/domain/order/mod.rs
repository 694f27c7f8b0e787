// ============================================================================
// Order Domain - serializable order events
// ============================================================================
//
// - Value objects (OrderItem)
// - Events (OrderCreated, OrderConfirmed, etc.)
// - Registration of every order event with a TypeRegistry
//
// ============================================================================

pub mod value_objects;
pub mod events;

pub use value_objects::*;
pub use events::*;

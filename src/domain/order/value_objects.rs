use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Order Value Objects
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

impl OrderItem {
    pub fn new(product_id: Uuid, quantity: i32) -> Self {
        Self { product_id, quantity }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

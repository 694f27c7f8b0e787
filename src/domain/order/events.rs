use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::OrderItem;
use crate::serializer::{from_payload, to_payload, Payload, Serializable, SerializerError, TypeRegistry};

// ============================================================================
// Order Events - serializable domain events
// ============================================================================
//
// Class names are stable aliases rather than Rust type paths, so stored
// envelopes survive module moves.
//
// ============================================================================

/// Order Created - Initial event in order lifecycle
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderCreated {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub items: Vec<OrderItem>,
}

/// Order Items Updated - Order contents modified
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderItemsUpdated {
    pub order_id: Uuid,
    pub items: Vec<OrderItem>,
    pub reason: Option<String>,
}

/// Order Confirmed - Order accepted for fulfillment
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderConfirmed {
    pub order_id: Uuid,
    pub confirmed_at: DateTime<Utc>,
}

/// Order Shipped - Order dispatched to customer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderShipped {
    pub order_id: Uuid,
    pub tracking_number: String,
    pub carrier: String,
    pub shipped_at: DateTime<Utc>,
}

/// Order Delivered - Order successfully delivered
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderDelivered {
    pub order_id: Uuid,
    pub delivered_at: DateTime<Utc>,
    pub signature: Option<String>,
}

/// Order Cancelled - Order lifecycle ended
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderCancelled {
    pub order_id: Uuid,
    pub reason: Option<String>,
    pub cancelled_by: Option<Uuid>,
}

// All order events carry their fields as-is in the payload.
macro_rules! serde_serializable {
    ($($event:ty => $class:literal),+ $(,)?) => {
        $(
            impl Serializable for $event {
                fn class_name() -> &'static str {
                    $class
                }

                fn serialize(&self) -> Result<Payload, SerializerError> {
                    to_payload(self)
                }

                fn deserialize(payload: &Payload) -> Result<Self, SerializerError> {
                    from_payload($class, payload)
                }
            }
        )+
    };
}

serde_serializable! {
    OrderCreated => "order.created",
    OrderItemsUpdated => "order.items_updated",
    OrderConfirmed => "order.confirmed",
    OrderShipped => "order.shipped",
    OrderDelivered => "order.delivered",
    OrderCancelled => "order.cancelled",
}

/// Register every order event with the registry
pub fn register_order_events(registry: &mut TypeRegistry) -> Result<(), SerializerError> {
    registry
        .register::<OrderCreated>()?
        .register::<OrderItemsUpdated>()?
        .register::<OrderConfirmed>()?
        .register::<OrderShipped>()?
        .register::<OrderDelivered>()?
        .register::<OrderCancelled>()?;

    tracing::info!(classes = registry.len(), "Registered order events");
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

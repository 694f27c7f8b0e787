use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use simple_serializer::domain::order::{
    register_order_events, OrderCancelled, OrderCreated, OrderItem, OrderItemsUpdated,
};
use simple_serializer::{Serializer, SerializableObject, SerializerConfig, SimpleSerializer, TypeRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,simple_serializer=debug"))
        )
        .init();

    tracing::info!("Starting serializer demo");

    // === 1. Populate the registry before any serializer exists ===
    let mut registry = TypeRegistry::new();
    register_order_events(&mut registry)?;

    let serializer: Arc<dyn Serializer> =
        Arc::new(SimpleSerializer::with_config(registry, SerializerConfig::strict()));

    // === 2. Order lifecycle events ===
    let order_id = Uuid::new_v4();
    let events: Vec<Arc<dyn SerializableObject>> = vec![
        Arc::new(OrderCreated {
            order_id,
            customer_id: Uuid::new_v4(),
            items: vec![
                OrderItem::new(Uuid::new_v4(), 2),
                OrderItem::new(Uuid::new_v4(), 1),
            ],
        }),
        Arc::new(OrderItemsUpdated {
            order_id,
            items: vec![OrderItem::new(Uuid::new_v4(), 5)],
            reason: None,
        }),
        Arc::new(OrderCancelled {
            order_id,
            reason: Some("Customer requested cancellation".to_string()),
            cancelled_by: None,
        }),
    ];

    // === 3. Round trip every event concurrently ===
    let mut handles = Vec::with_capacity(events.len());
    for event in events {
        let serializer = serializer.clone();
        handles.push(tokio::spawn(async move {
            let envelope = serializer.serialize_object(event.as_ref())?;
            let data = envelope.clone().into_value();
            let rebuilt = serializer.deserialize(&data)?;
            let again = serializer.serialize_object(rebuilt.as_ref())?;

            anyhow::ensure!(envelope == again, "Round trip changed envelope for {}", envelope.class);
            tracing::info!(class = %envelope.class, envelope = %data, "✅ Round trip");
            Ok::<_, anyhow::Error>(())
        }));
    }

    for handle in handles {
        handle.await??;
    }

    // === 4. Rejected input ===
    let bad = serde_json::json!({"class": "order.refunded", "payload": {}});
    if let Err(e) = serializer.deserialize(&bad) {
        tracing::info!(error = %e, kind = ?e.kind(), "Unknown class rejected");
    }

    tracing::info!("🎉 Demo complete!");

    Ok(())
}

use comanda::{
    Client, CycleOutcome, Executor, Order, OrderStatus, OrderSync, StoreProfile, SyncConfig,
    SyncEvent,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::{str::FromStr, time::Duration};
use uuid::Uuid;

async fn new_store<E: Executor + 'static>(client: &Client<E>, prefix: &str) -> Uuid {
    client
        .create_store(&StoreProfile {
            name: format!("{} {}", prefix, Uuid::new_v4().simple()),
            ..Default::default()
        })
        .await
        .expect("Failed to create the store")
        .id
        .expect("The store did not receive an id")
}

fn table_order(store_id: Uuid, table: &str) -> Order {
    Order {
        store_id: Some(store_id),
        order_type: "MESA".into(),
        table_number: Some(table.into()),
        items: json!([{ "name": "Pastel", "quantity": 2, "price": 8.5 }]),
        total: Decimal::from(17),
        waitstaff_name: Some("Carla".into()),
        ..Default::default()
    }
}

pub async fn orders<E: Executor + 'static>(client: &Client<E>) {
    let store_id = new_store(client, "Pedidos").await;
    let placed = client
        .place_order(&Order {
            order_type: "DELIVERY".into(),
            customer_name: Some("Bruno".into()),
            customer_phone: Some("+55 11 99999-0000".into()),
            delivery_address: Some("Rua A, 10".into()),
            payment_method: Some("DINHEIRO".into()),
            change_for: Decimal::from(50),
            discount_amount: Decimal::from_str("2.50").unwrap(),
            coupon_applied: Some("BEMVINDO".into()),
            ..table_order(store_id, "4")
        })
        .await
        .expect("Failed to place the order");
    assert!(!placed.id.is_empty());
    assert_eq!(placed.status, OrderStatus::Received);
    let second = client
        .place_order(&table_order(store_id, "7"))
        .await
        .expect("Failed to place the order");

    let orders = client
        .recent_orders(Some(store_id), 100)
        .await
        .expect("Failed to fetch the orders");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, second.id, "Most recent first");
    let first = &orders[1];
    assert_eq!(first.customer_name.as_deref(), Some("Bruno"));
    assert_eq!(first.change_for, Decimal::from(50));
    assert_eq!(first.discount_amount, Decimal::from_str("2.5").unwrap());
    assert_eq!(first.item_count(), 1);
    assert_eq!(first.items[0]["name"], "Pastel");
    assert!(first.created_at > time::OffsetDateTime::UNIX_EPOCH);

    client
        .update_order_status(&placed.id, &OrderStatus::Preparing)
        .await
        .expect("Failed to update the status");
    let orders = client
        .recent_orders(Some(store_id), 1)
        .await
        .expect("Failed to fetch the orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Received);
    let orders = client
        .recent_orders(Some(store_id), 100)
        .await
        .expect("Failed to fetch the orders");
    assert_eq!(orders[1].status, OrderStatus::Preparing);
}

pub async fn synchronization<E: Executor + 'static>(client: &Client<E>) {
    let store_id = new_store(client, "Cozinha").await;
    let first = client
        .place_order(&table_order(store_id, "1"))
        .await
        .expect("Failed to place the order");
    let sync = OrderSync::new(
        client.clone(),
        SyncConfig::default()
            .store_id(store_id)
            .interval(Duration::from_secs(3600)),
    );
    let mut events = sync.subscribe();

    assert_eq!(
        sync.sync_now().await.expect("Priming cycle failed"),
        CycleOutcome::Primed { orders: 1 }
    );
    assert!(events.try_recv().is_err());

    client
        .update_order_status(&first.id, &OrderStatus::Ready)
        .await
        .expect("Failed to update the status");
    client
        .place_order(&table_order(store_id, "2"))
        .await
        .expect("Failed to place the order");
    let CycleOutcome::Synced(delta) = sync.sync_now().await.expect("Cycle failed") else {
        panic!("Expected a synchronized cycle");
    };
    assert_eq!(delta.new_order_count, 1);
    assert_eq!(delta.ready_transitions.into_iter().collect::<Vec<_>>(), [first.id.clone()]);
    assert!(matches!(
        events.try_recv(),
        Ok(SyncEvent::NewOrders { count: 1 })
    ));
    assert!(matches!(
        events.try_recv(),
        Ok(SyncEvent::OrdersReady { ids }) if ids.contains(&first.id)
    ));
    assert_eq!(sync.snapshot().len(), 2);
}

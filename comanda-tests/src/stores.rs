use comanda::{Client, Executor, StoreLookup, StoreProfile};
use serde_json::json;
use uuid::Uuid;

pub async fn stores<E: Executor + 'static>(client: &Client<E>) {
    let slug = format!("loja-{}", Uuid::new_v4().simple());
    let created = client
        .create_store(&StoreProfile {
            slug: slug.clone(),
            name: "Loja Teste".into(),
            address: "Rua das Flores, 100".into(),
            settings: json!({ "primaryColor": "#123456", "deliveryFee": 5 }),
            ..Default::default()
        })
        .await
        .expect("Failed to create the store");
    let id = created.id.expect("The store did not receive an id");
    assert_eq!(created.slug, slug);
    assert!(created.is_active);

    let StoreLookup::Active(store) = client
        .load_store(&slug)
        .await
        .expect("Failed to load the store")
    else {
        panic!("The store was expected to be active");
    };
    assert_eq!(store.id, Some(id));
    assert_eq!(store.name, "Loja Teste");
    assert_eq!(store.primary_color(), "#123456");
    assert_eq!(store.setting("deliveryFee"), Some(&json!(5)));

    client
        .set_store_active(id, false)
        .await
        .expect("Failed to suspend the store");
    assert!(matches!(
        client.load_store(&slug).await.expect("Failed to load the store"),
        StoreLookup::Suspended(..)
    ));
    client
        .set_store_active(id, true)
        .await
        .expect("Failed to reactivate the store");

    let settings = json!({ "primaryColor": "#654321", "secondaryColor": "#000000" });
    client
        .save_store_settings(id, &settings)
        .await
        .expect("Failed to save the settings");
    let store = client
        .load_store(&slug)
        .await
        .expect("Failed to load the store");
    let store = store.store().expect("The store disappeared");
    assert_eq!(store.settings, settings);
    assert_eq!(store.secondary_color(), "#000000");

    let stores = client.list_stores().await.expect("Failed to list the stores");
    assert!(stores.iter().any(|v| v.slug == slug));

    assert_eq!(
        client
            .load_store(&format!("missing-{}", Uuid::new_v4().simple()))
            .await
            .expect("Failed to look up a missing store"),
        StoreLookup::NotFound
    );
}

use crate::silent_logs;
use comanda::{Client, Executor, Product, StoreProfile};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

pub async fn menu<E: Executor + 'static>(client: &Client<E>) {
    let store = client
        .create_store(&StoreProfile {
            name: format!("Cardapio {}", Uuid::new_v4().simple()),
            ..Default::default()
        })
        .await
        .expect("Failed to create the store");
    let store_id = store.id.expect("The store did not receive an id");

    // Categories
    let drinks = client
        .add_category(store_id, "  Bebidas ")
        .await
        .expect("Failed to add a category");
    client
        .add_category(store_id, "Lanches")
        .await
        .expect("Failed to add a category");
    assert_eq!(drinks.name, "Bebidas");
    silent_logs! {
        assert!(
            client.add_category(store_id, "Bebidas").await.is_err(),
            "Category names are unique within a store"
        );
    }
    let mut names = client
        .categories(store_id)
        .await
        .expect("Failed to list the categories");
    names.sort();
    assert_eq!(names, ["Bebidas", "Lanches"]);
    client
        .delete_category(&drinks.id)
        .await
        .expect("Failed to delete the category");
    assert_eq!(
        client
            .categories(store_id)
            .await
            .expect("Failed to list the categories"),
        ["Lanches"]
    );

    // Products
    let saved = client
        .save_product(&Product {
            store_id: Some(store_id),
            name: "X-Burguer".into(),
            price: Decimal::from_str("24.90").unwrap(),
            category: "Lanches".into(),
            featured_day: Some(2),
            ..Default::default()
        })
        .await
        .expect("Failed to save the product");
    assert!(!saved.id.is_empty());
    let updated = client
        .save_product(&Product {
            price: Decimal::from_str("26.50").unwrap(),
            is_active: false,
            ..saved.clone()
        })
        .await
        .expect("Failed to update the product");
    assert_eq!(updated.id, saved.id);
    let products = client
        .products(store_id)
        .await
        .expect("Failed to list the products");
    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product.name, "X-Burguer");
    assert_eq!(product.price, Decimal::from_str("26.50").unwrap());
    assert!(!product.is_active);
    assert_eq!(product.featured_day, Some(2));
    assert!(!product.is_by_weight);

    client
        .delete_product(&saved.id)
        .await
        .expect("Failed to delete the product");
    assert!(
        client
            .products(store_id)
            .await
            .expect("Failed to list the products")
            .is_empty()
    );
}

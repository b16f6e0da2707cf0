use comanda::{Authentication, Client, Executor, StaffMember, StaffRole, StoreProfile};
use uuid::Uuid;

pub async fn staff<E: Executor + 'static>(client: &Client<E>) {
    let store = client
        .create_store(&StoreProfile {
            name: format!("Equipe {}", Uuid::new_v4().simple()),
            ..Default::default()
        })
        .await
        .expect("Failed to create the store");
    let store_id = store.id.expect("The store did not receive an id");
    let name = format!("carla-{}", Uuid::new_v4().simple());
    let identity = client
        .add_staff(&StaffMember {
            store_id: Some(store_id),
            name: name.clone(),
            password: "s3nha".into(),
            role: StaffRole::Manager,
            ..Default::default()
        })
        .await
        .expect("Failed to add the staff member");
    assert_eq!(identity.name, name);
    assert!(!identity.id.is_empty());

    let granted = client
        .verify_credentials(Some(&name), Some("s3nha"), Some(store_id))
        .await
        .expect("Failed to verify the credentials");
    assert_eq!(granted, Authentication::Granted(identity.clone()));
    assert!(
        granted
            .identity()
            .expect("Expected an identity")
            .role
            .is_manager()
    );

    let unscoped = client
        .verify_credentials(Some(&name), Some("s3nha"), None)
        .await
        .expect("Failed to verify the credentials");
    assert!(unscoped.is_granted());

    for (secret, scope) in [("errada", Some(store_id)), ("s3nha", Some(Uuid::new_v4()))] {
        assert_eq!(
            client
                .verify_credentials(Some(&name), Some(secret), scope)
                .await
                .expect("Failed to verify the credentials"),
            Authentication::rejected()
        );
    }

    let members = client.staff(store_id).await.expect("Failed to list the staff");
    assert_eq!(members, [identity.clone()]);
    let id = Uuid::parse_str(&identity.id).expect("Staff ids are uuids");
    client
        .delete_staff(id)
        .await
        .expect("Failed to delete the staff member");
    assert!(
        !client
            .verify_credentials(Some(&name), Some("s3nha"), Some(store_id))
            .await
            .expect("Failed to verify the credentials")
            .is_granted()
    );
}

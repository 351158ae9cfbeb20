use rolo::features;

#[test]
fn clients_are_always_enabled() {
    assert!(features::is_enabled("clients"));
    assert!(!features::is_enabled("licensing"));
}

#[cfg(feature = "server")]
mod server {
    use rolo::domain::config::{ApiConfig, StoreKind};
    use rolo::features::clients::ClientGateway;
    use rolo_database::Database;

    fn config(store: StoreKind) -> ApiConfig {
        let mut config = ApiConfig::default();
        config.directory.store = store;
        config
    }

    #[test]
    fn memory_store_needs_no_database() {
        let slices = rolo::init(&config(StoreKind::Memory), None).expect("init");
        assert_eq!(slices.len(), 1);
        assert!(slices[0].downcast_ref::<rolo::features::clients::Clients>().is_some());
    }

    #[test]
    fn surreal_store_without_database_fails() {
        assert!(rolo::init(&config(StoreKind::Surreal), None).is_err());
    }

    #[tokio::test]
    async fn surreal_store_uses_the_connection() {
        let db = Database::builder()
            .url("mem://")
            .session("rolo", "facade")
            .migrations(rolo::migrations())
            .init()
            .await
            .expect("mem:// connects");

        let gateway = rolo::clients_gateway(&config(StoreKind::Surreal), Some(&db)).unwrap();
        assert!(gateway.list().await.unwrap().is_empty());
    }
}

#![cfg(feature = "server")]

use rolo_clients::{
    ClientCandidate, ClientError, ClientGateway, ClientId, Field, MIGRATIONS, RuleSet,
    SurrealGateway,
};
use rolo_database::Database;

async fn gateway(db_name: &str) -> SurrealGateway {
    let db = Database::builder()
        .url("mem://")
        .session("rolo_test", db_name)
        .migrations(MIGRATIONS)
        .init()
        .await
        .expect("connect to mem://");
    SurrealGateway::new(db)
}

fn client(name: &str, email: &str) -> rolo_clients::NewClient {
    RuleSet::standard().validate(&ClientCandidate::new(name, email)).expect("valid candidate")
}

#[tokio::test]
async fn created_clients_are_listed_newest_first() {
    let store = gateway("ordering").await;
    let first = store.create(client("Ana Pérez", "ana@x.com")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.create(client("Luis Gómez", "luis@y.org")).await.unwrap();

    let listed = store.list().await.unwrap();
    let ids: Vec<&ClientId> = listed.iter().map(|r| &r.id).collect();
    assert_eq!(ids, vec![&second.id, &first.id]);
    assert_eq!(listed[1].name, "Ana Pérez");
    assert_eq!(listed[1].created_at.timestamp_micros(), first.created_at.timestamp_micros());
}

#[tokio::test]
async fn duplicate_emails_are_rejected_by_the_index() {
    let store = gateway("unique_email").await;
    store.create(client("Ana Pérez", "ana@x.com")).await.unwrap();

    let err = store.create(client("Otra Ana", "ANA@x.com")).await.unwrap_err();
    assert!(matches!(err, ClientError::DuplicateKey { field: Field::Email, .. }), "{err}");
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn phones_survive_the_round_trip() {
    let store = gateway("phones").await;
    let candidate = ClientCandidate::new("Marta Ruiz", "marta@z.es").with_phone("+34 600 123 456");
    let created = store.create(RuleSet::standard().validate(&candidate).unwrap()).await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(listed[0].phone.as_deref(), Some("+34 600 123 456"));
    assert_eq!(listed[0].id, created.id);
}

#[tokio::test]
async fn delete_removes_only_known_ids() {
    let store = gateway("delete").await;
    let record = store.create(client("Ana Pérez", "ana@x.com")).await.unwrap();

    let missing = store.delete(&ClientId::generate()).await.unwrap_err();
    assert!(matches!(missing, ClientError::NotFound { .. }));

    store.delete(&record.id).await.unwrap();
    assert!(store.list().await.unwrap().is_empty());

    let again = store.delete(&record.id).await.unwrap_err();
    assert!(matches!(again, ClientError::NotFound { .. }));
}

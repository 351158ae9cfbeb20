#![cfg(feature = "server")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use rolo_clients::api::{self, ClientPage};
use rolo_clients::{ClientCandidate, ClientGateway, ClientRecord, MemoryGateway, RuleSet};
use rolo_kernel::domain::config::{ApiConfig, DirectoryConfig};
use rolo_kernel::envelope::Envelope;
use rolo_kernel::server::ApiState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use utoipa_axum::router::OpenApiRouter;

fn app(gateway: Arc<MemoryGateway>, debug: bool) -> Router {
    let mut config = ApiConfig::default();
    config.app.debug = debug;
    let slice = rolo_clients::init(&DirectoryConfig::default(), gateway).expect("slice");
    let state = ApiState::builder().config(config).register_slice(slice).build().expect("state");

    let (router, _openapi) =
        OpenApiRouter::new().nest("/api/v1", api::router()).split_for_parts();
    router.with_state(state)
}

fn post(body: &str) -> Request<Body> {
    Request::post("/api/v1/clientes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn create_then_list() {
    let gateway = Arc::new(MemoryGateway::new());
    let app = app(gateway.clone(), false);

    let body =
        json!({ "nombre": "  ana  pérez ", "email": "Ana@X.com", "telefono": "600 123 456" });
    let (status, created) = send(&app, post(&body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Client created successfully");
    assert_eq!(created["data"]["nombre"], "Ana  Pérez");
    assert_eq!(created["data"]["email"], "ana@x.com");

    let (status, listed) =
        send(&app, Request::get("/api/v1/clientes").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let envelope: Envelope<Vec<ClientRecord>> = serde_json::from_value(listed).unwrap();
    let records = envelope.data.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_str(), created["data"]["id"].as_str().unwrap());
    assert_eq!(gateway.len(), 1);
}

#[tokio::test]
async fn invalid_fields_are_reported_per_field() {
    let app = app(Arc::new(MemoryGateway::new()), false);

    let (status, body) = send(&app, post(r#"{"nombre": "Aaaaa", "email": "nope"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "validation_failed");
    assert!(body["errors"]["nombre"].is_string());
    assert!(body["errors"]["email"].is_string());
    assert!(body["errors"].get("telefono").is_none());
}

#[tokio::test]
async fn list_pages_use_the_configured_size() {
    let gateway = Arc::new(MemoryGateway::new());
    let names = [
        "Ana", "Luis", "Marta", "Pablo", "Rosa", "Juan", "Elena", "Diego", "Sara", "Hugo", "Irene",
        "Mateo",
    ];
    for (i, name) in names.iter().enumerate() {
        let candidate = ClientCandidate::new(format!("{name} Ruiz"), format!("c{i}@x.com"));
        gateway.create(RuleSet::standard().validate(&candidate).unwrap()).await.unwrap();
    }
    let app = app(gateway, false);

    let get = |uri: &str| Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(&app, get("/api/v1/clientes?page=2")).await;
    assert_eq!(status, StatusCode::OK);
    let page: ClientPage = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!((page.current_page, page.total, page.per_page, page.last_page), (2, 12, 10, 2));
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[1].name, "Ana Ruiz");

    let (_, body) = send(&app, get("/api/v1/clientes?page=99")).await;
    assert_eq!(body["data"]["current_page"], 2);

    let (status, body) = send(&app, get("/api/v1/clientes?page=two")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_query");
}

#[tokio::test]
async fn server_strips_foreign_phone_characters() {
    let app = app(Arc::new(MemoryGateway::new()), false);

    let body =
        json!({ "nombre": "Ana Pérez", "email": "ana@x.com", "telefono": "tel. 600.123.456" });
    let (status, created) = send(&app, post(&body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["telefono"], "600123456");

    let body = json!({ "nombre": "Luis Gómez", "email": "luis@x.com", "telefono": "n/a" });
    let (status, created) = send(&app, post(&body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["data"]["telefono"].is_null());
}

#[tokio::test]
async fn duplicate_email_is_a_422() {
    let app = app(Arc::new(MemoryGateway::new()), false);
    let (status, _) = send(&app, post(r#"{"nombre": "Ana Pérez", "email": "ana@x.com"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);

    let retry = post(r#"{"nombre": "Luis Gómez", "email": "ANA@x.com"}"#);
    let (status, body) = send(&app, retry).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "duplicate_key");
    assert_eq!(body["errors"]["email"], "This email is already registered");
}

#[tokio::test]
async fn malformed_json_is_a_400() {
    let app = app(Arc::new(MemoryGateway::new()), false);
    let (status, body) = send(&app, post("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid_body");
}

#[tokio::test]
async fn delete_known_and_unknown_ids() {
    let gateway = Arc::new(MemoryGateway::new());
    let app = app(gateway.clone(), false);
    let (_, created) = send(&app, post(r#"{"nombre": "Ana Pérez", "email": "ana@x.com"}"#)).await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();

    let delete =
        |id: &str| Request::delete(format!("/api/v1/clientes/{id}")).body(Body::empty()).unwrap();

    let (status, body) = send(&app, delete(&id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Client deleted successfully");
    assert!(body.get("data").is_none());
    assert!(gateway.is_empty());

    let (status, body) = send(&app, delete(&id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, delete("not-a-valid-id!")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[derive(Debug)]
struct BrokenStore;

#[async_trait::async_trait]
impl ClientGateway for BrokenStore {
    async fn list(&self) -> Result<Vec<ClientRecord>, rolo_clients::ClientError> {
        Err("disk on fire".into())
    }

    async fn create(
        &self,
        _client: rolo_clients::NewClient,
    ) -> Result<ClientRecord, rolo_clients::ClientError> {
        Err("disk on fire".into())
    }

    async fn delete(&self, _id: &rolo_clients::ClientId) -> Result<(), rolo_clients::ClientError> {
        Err("disk on fire".into())
    }
}

fn broken_app(debug: bool) -> Router {
    let mut config = ApiConfig::default();
    config.app.debug = debug;
    let slice = rolo_clients::init(&DirectoryConfig::default(), Arc::new(BrokenStore)).unwrap();
    let state = ApiState::builder().config(config).register_slice(slice).build().unwrap();
    let (router, _) = OpenApiRouter::new().nest("/api/v1", api::router()).split_for_parts();
    router.with_state(state)
}

#[tokio::test]
async fn internal_errors_are_redacted_unless_debugging() {
    let get = || Request::get("/api/v1/clientes").body(Body::empty()).unwrap();

    let (status, body) = send(&broken_app(false), get()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to retrieve clients");
    assert_eq!(body["error"], "Internal server error");

    let (_, body) = send(&broken_app(true), get()).await;
    assert!(body["error"].as_str().unwrap().contains("disk on fire"));
}

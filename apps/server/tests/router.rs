use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use rolo::domain::config::StoreKind;
use rolo_server::Server;
use serde_json::Value;
use tower::ServiceExt;

async fn call(server: &Server, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = server.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn health_reports_up() {
    let server = Server::builder().store(StoreKind::Memory).build().await.unwrap();
    assert!(server.database().is_none());

    let (status, body) = call(&server, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "up");
}

#[tokio::test]
async fn clients_are_served_under_the_api_prefix() {
    let server = Server::builder().store(StoreKind::Memory).build().await.unwrap();

    let create = Request::post("/api/v1/clientes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"nombre": "Ana Pérez", "email": "ana@x.com"}"#))
        .unwrap();
    let (status, body) = call(&server, create).await;
    assert_eq!(status, StatusCode::CREATED, "{}", String::from_utf8_lossy(&body));

    let (status, body) =
        call(&server, Request::get("/api/v1/clientes").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["data"][0]["email"], "ana@x.com");

    let (status, _) = call(&server, Request::get("/clientes").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn surreal_store_boots_in_memory() {
    let server = Server::builder().store(StoreKind::Surreal).build().await.unwrap();
    assert!(server.database().is_some());

    let (status, body) =
        call(&server, Request::get("/api/v1/clientes").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["data"], Value::Array(Vec::new()));
}

#[tokio::test]
async fn api_reference_is_served() {
    let server = Server::builder().store(StoreKind::Memory).build().await.unwrap();
    let (status, body) = call(&server, Request::get("/api").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("/api/v1/clientes"));
}

#[tokio::test]
async fn missing_certificates_fail_the_build() {
    let mut config = rolo::domain::config::ApiConfig::default();
    config.directory.store = StoreKind::Memory;
    config.server.ssl = Some(rolo::domain::config::SslConfig {
        cert: "/definitely/not/here/cert.pem".into(),
        key: "/definitely/not/here/key.pem".into(),
    });
    assert!(Server::builder().config(config).build().await.is_err());
}

//! GET /version 端到端测试：Service → Server → HTTP 路由

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use service_skeleton::config::HttpConfig;
use service_skeleton::logger::Logger;
use service_skeleton::server::{ErrorEnvelope, LifecycleState, Server, ServerConfig};
use service_skeleton::service::{Service, ServiceConfig, VersionResponse};
use service_skeleton::transport::http::HttpServer;
use service_skeleton::transport::JSON_CONTENT_TYPE;
use tower::util::ServiceExt;

fn server() -> Arc<Server> {
    let logger = Logger::new("test");
    let service = Service::new(ServiceConfig {
        logger: Some(logger.component("service")),
        description: "d".to_string(),
        git_commit: "abc123".to_string(),
        name: "svc".to_string(),
        project_version: "0.1.0".to_string(),
        source: "http://x".to_string(),
    })
    .unwrap();

    Arc::new(
        Server::new(ServerConfig {
            logger: Some(logger.component("server")),
            service: Some(Arc::new(service)),
        })
        .unwrap(),
    )
}

async fn get(uri: &str) -> (StatusCode, Option<String>, String) {
    let app = HttpServer::new(HttpConfig::default(), server())
        .router()
        .unwrap();
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_get_version() {
    let (status, content_type, body) = get("/version").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(JSON_CONTENT_TYPE));
    assert!(body.contains(r#""name":"svc""#), "{}", body);
    assert!(body.contains(r#""gitCommit":"abc123""#), "{}", body);

    let response: VersionResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.description, "d");
    assert_eq!(response.source, "http://x");
    assert_eq!(response.project_version, "0.1.0");
    assert!(response.os_arch.contains('/'));
    assert!(!response.runtime_version.is_empty());
}

#[tokio::test]
async fn test_repeated_calls_are_stable() {
    let (_, _, first) = get("/version").await;
    let (_, _, second) = get("/version").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_route_returns_envelope() {
    let (status, content_type, body) = get("/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type.as_deref(), Some(JSON_CONTENT_TYPE));
    let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap();
    assert_eq!(envelope.error, "route not found: /nope");
}

#[tokio::test]
async fn test_run_with_shutdown_boots_and_stops() {
    let server = server();
    let http_server = HttpServer::new(HttpConfig::new("127.0.0.1", 0), server.clone());

    http_server.run_with_shutdown(async {}).await.unwrap();

    assert_eq!(server.state(), LifecycleState::Stopped);
}

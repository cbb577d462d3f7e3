//! Tests for the backend composition root

#![cfg(feature = "server")]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::routing::get;
use prescripto_http::{ApiRouters, HttpServer, Json, Router, ServerConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let admin = Router::new().route(
        "/dashboard",
        get(|| async { Json(json!({"success": true, "dashData": {"doctors": 3}})) }),
    );
    let api = ApiRouters::default().with_admin(admin);
    HttpServer::new(ServerConfig::default(), api).unwrap().app()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_liveness_root() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"API Working");
}

#[tokio::test]
async fn test_mounted_router_is_reachable() {
    let response = app()
        .oneshot(
            Request::get("/api/admin/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["dashData"]["doctors"], 3);
}

#[tokio::test]
async fn test_unknown_route_answers_failure_envelope() {
    let response = app()
        .oneshot(
            Request::get("/api/doctor/nothing-here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({"success": false, "message": "Route not found"}));
}

#[tokio::test]
async fn test_preflight_from_allowed_origin() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/admin/dashboard")
                .header(header::ORIGIN, "http://localhost:5174")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "atoken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5174"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("atoken"));
    assert!(allowed.contains("dtoken"));
}

#[tokio::test]
async fn test_disallowed_origin_gets_no_cors_headers() {
    let response = app()
        .oneshot(
            Request::get("/")
                .header(header::ORIGIN, "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[tokio::test]
async fn test_serve_until_shutdown() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    };
    let server = HttpServer::new(config, ApiRouters::default()).unwrap();
    let listener = server.bind().await.unwrap();
    assert_ne!(listener.local_addr().unwrap().port(), 0);

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve(listener, async {
        let _ = rx.await;
    }));

    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

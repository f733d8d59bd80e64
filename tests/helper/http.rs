//! Router test utilities

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt; // for .oneshot()

use version_check::catalog::loader::load_catalog;
use version_check::http::server::{AppState, build_router};

use super::{CATALOG_TOML, write_catalog};

/// Router over the shared test catalog, loaded from a real TOML file
pub fn create_test_router(allow_get: bool) -> Router {
    let (_temp_dir, path) = write_catalog("catalog.toml", CATALOG_TOML);
    let catalog = load_catalog(&path).unwrap();
    build_router(AppState::new(catalog, allow_get))
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request and collect status and body text
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

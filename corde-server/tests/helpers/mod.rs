//! Shared helpers for integration tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, RgbImage};
use tempfile::TempDir;

use corde_server::{build_router, AppState};

pub const BOUNDARY: &str = "corde-test-boundary";

/// A router wired to a fresh temp-dir root and database
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    // Held so the data directory outlives the test.
    _root: TempDir,
}

/// Build a test application over a temporary root folder
pub async fn spawn_test_app() -> TestApp {
    let root = tempfile::tempdir().expect("create temp root");
    corde_common::config::ensure_root_folder(root.path()).expect("create data dirs");

    let db_path = corde_common::config::database_path(root.path());
    let pool = corde_server::db::init_database_pool(&db_path)
        .await
        .expect("init database");

    let state = AppState::new(pool, root.path());
    let app = build_router(state.clone());

    TestApp { app, state, _root: root }
}

/// A small colorful PNG suitable for the full pipeline
pub fn sample_outfit_png() -> Vec<u8> {
    let mut image = RgbImage::new(90, 150);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        pixel.0 = match (x < 45, y < 75) {
            (true, true) => [160, 20, 20],
            (false, true) => [20, 20, 90],
            (true, false) => [240, 230, 90],
            (false, false) => [250, 250, 250],
        };
    }
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// Build a multipart upload request
pub fn multipart_upload_request(
    image_bytes: &[u8],
    content_type: &str,
    style: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();

    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"image\"; filename=\"outfit.png\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(image_bytes);
    body.extend_from_slice(b"\r\n");

    if let Some(style) = style {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"style\"\r\n\r\n");
        body.extend_from_slice(style.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("build request")
}

/// A multipart request with no image field at all
pub fn multipart_styleonly_request(style: &str) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"style\"\r\n\r\n");
    body.extend_from_slice(style.as_bytes());
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("build request")
}

/// Simple GET request
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("build request")
}

/// JSON POST request
pub fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .expect("build request")
}

/// Collect a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("read body").to_bytes();
    serde_json::from_slice(&bytes).expect("parse json body")
}

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use heroes_api::config::ServerConfig;
use heroes_api::router::build_app_router;
use heroes_api::state::AppState;
use heroes_core::uploads::UploadDir;
use heroes_db::MemorySuperheroStore;

/// Smallest byte sequence recognised as a PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
/// Smallest byte sequence recognised as a JPEG.
pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";

const BOUNDARY: &str = "heroes-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(uploads_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        uploads_dir,
        max_upload_bytes: 25 * 1024 * 1024,
        database_url: None,
    }
}

/// A router over an in-memory store and a temporary upload directory.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemorySuperheroStore>,
    pub uploads: UploadDir,
    _tmp: TempDir,
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> TestApp {
    build_test_app_with_upload_limit(25 * 1024 * 1024)
}

/// Same as [`build_test_app`] with a custom request body limit.
pub fn build_test_app_with_upload_limit(max_upload_bytes: usize) -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        max_upload_bytes,
        ..test_config(tmp.path().to_path_buf())
    };
    let store = Arc::new(MemorySuperheroStore::new());
    let uploads = UploadDir::new(tmp.path());

    let state = AppState {
        store: store.clone(),
        uploads: uploads.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        uploads,
        _tmp: tmp,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Number of files currently in the upload directory.
    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.uploads.root()).unwrap().count()
    }

    /// Whether the file behind a public `/uploads/...` path exists.
    pub fn upload_exists(&self, public_path: &str) -> bool {
        self.uploads
            .resolve(public_path)
            .is_some_and(|p| p.exists())
    }
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, method: Method, uri: &str) -> Request<Body> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.bytes))
            .unwrap()
    }
}

/// A complete create form with one PNG image.
pub fn hero_form(nickname: &str) -> MultipartBody {
    MultipartBody::new()
        .text("nickname", nickname)
        .text("real_name", "Clark Kent")
        .text("origin_description", "Born on Krypton")
        .text("superpowers", "Flight, Strength")
        .text("catch_phrase", "Up, up and away")
        .file("images", "hero.png", PNG_BYTES)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.send(request).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.send(request).await
}

pub async fn post_form(app: &TestApp, uri: &str, form: MultipartBody) -> Response<Body> {
    app.send(form.into_request(Method::POST, uri)).await
}

pub async fn put_form(app: &TestApp, uri: &str, form: MultipartBody) -> Response<Body> {
    app.send(form.into_request(Method::PUT, uri)).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Create a superhero through the API and return its JSON record.
pub async fn create_hero(app: &TestApp, nickname: &str) -> Value {
    let response = post_form(app, "/superheroes/create", hero_form(nickname)).await;
    assert_eq!(response.status(), 201, "creating {nickname}");
    body_json(response).await["superhero"].clone()
}

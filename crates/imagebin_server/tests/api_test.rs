//! End-to-end tests for the HTTP API.

use async_trait::async_trait;
use imagebin_core::ImageRecord;
use imagebin_database::{InMemoryImageRepository, MetadataRepository};
use imagebin_error::{DatabaseError, DatabaseErrorKind, ImagebinResult};
use imagebin_server::{AppState, ServerConfig, ServerConfigBuilder, create_router};
use imagebin_storage::FileSystemStorage;
use regex::Regex;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ALLOWED_ORIGIN: &str = "http://localhost:3000";
const API_KEY: &str = "test-api-key";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3, 4];

struct TestServer {
    base_url: String,
    upload_dir: PathBuf,
    repository: InMemoryImageRepository,
    client: reqwest::Client,
    _temp_dir: TempDir,
}

fn test_config(temp_dir: &TempDir) -> ServerConfigBuilder {
    let mut builder = ServerConfigBuilder::default();
    builder
        .api_key(API_KEY)
        .upload_dir(temp_dir.path().join("upload"));
    builder
}

async fn serve(config: ServerConfig, repository: impl MetadataRepository + 'static) -> String {
    let storage = FileSystemStorage::new(config.upload_dir());
    let app = create_router(AppState::new(config, storage, repository));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

impl TestServer {
    async fn start() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir).build().unwrap();
        Self::start_with(config, temp_dir).await
    }

    async fn start_with(config: ServerConfig, temp_dir: TempDir) -> Self {
        let upload_dir = config.upload_dir().clone();
        let repository = InMemoryImageRepository::new();
        let base_url = serve(config, repository.clone()).await;

        Self {
            base_url,
            upload_dir,
            repository,
            client: reqwest::Client::new(),
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn upload_form(&self, form: Form) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/image"))
            .header("origin", ALLOWED_ORIGIN)
            .header("x-api-key", API_KEY)
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    async fn upload(&self, filename: &str, bytes: &[u8], mime: &str) -> reqwest::Response {
        let part = Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime)
            .unwrap();
        self.upload_form(Form::new().part("image", part)).await
    }

    /// Upload and return the public path from the response.
    async fn upload_ok(&self, filename: &str, bytes: &[u8], mime: &str) -> String {
        let response = self.upload(filename, bytes, mime).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        body["data"]["path"].as_str().unwrap().to_string()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .header("origin", ALLOWED_ORIGIN)
            .header("x-api-key", API_KEY)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}

fn file_count(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

fn public_filename(path: &str) -> &str {
    path.strip_prefix("/image/").unwrap()
}

async fn assert_error(response: reqwest::Response, status: StatusCode, message: &str) {
    assert_eq!(response.status(), status);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["statusCode"], status.as_u16());
    assert_eq!(body["message"], message);
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await;

    let response = server.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "Server is running");
}

#[tokio::test]
async fn test_upload_then_retrieve() {
    let server = TestServer::start().await;

    let response = server.upload("photo.png", PNG_BYTES, "image/png").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Image uploaded successfully");

    let path = body["data"]["path"].as_str().unwrap();
    let pattern = Regex::new(r"^/image/[A-Za-z0-9_-]{32}\.png$").unwrap();
    assert!(pattern.is_match(path), "unexpected path {}", path);

    let response = server.get(path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(response.bytes().await.unwrap().as_ref(), PNG_BYTES);

    assert_eq!(server.repository.len().await, 1);
    assert_eq!(file_count(&server.upload_dir), 1);
}

#[tokio::test]
async fn test_all_accepted_extensions_round_trip() {
    let server = TestServer::start().await;

    for filename in ["a.jpg", "b.jpeg", "c.png", "d.webp", "E.PNG"] {
        let bytes = format!("contents of {}", filename).into_bytes();
        let path = server.upload_ok(filename, &bytes, "image/jpeg").await;

        let expected_ext = filename.rsplit('.').next().unwrap().to_ascii_lowercase();
        assert!(path.ends_with(&format!(".{}", expected_ext)), "{} -> {}", filename, path);

        let response = server.get(&path).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.bytes().await.unwrap().as_ref(), bytes.as_slice());
    }
}

#[tokio::test]
async fn test_missing_declared_mime_falls_back_to_extension() {
    let server = TestServer::start().await;

    let part = Part::bytes(b"webp bytes".to_vec()).file_name("pic.webp");
    let response = server.upload_form(Form::new().part("image", part)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();

    let response = server.get(body["data"]["path"].as_str().unwrap()).await;
    assert_eq!(response.headers()["content-type"], "image/webp");
}

#[tokio::test]
async fn test_disallowed_extension_creates_nothing() {
    let server = TestServer::start().await;

    let response = server.upload("animation.gif", b"GIF89a", "image/gif").await;
    assert_error(response, StatusCode::BAD_REQUEST, "Invalid file extension").await;

    assert!(server.repository.is_empty().await);
    assert_eq!(file_count(&server.upload_dir), 0);
}

#[tokio::test]
async fn test_filename_without_extension_rejected() {
    let server = TestServer::start().await;

    let response = server.upload("README", b"plain", "image/png").await;
    assert_error(response, StatusCode::BAD_REQUEST, "Invalid file extension").await;
}

#[tokio::test]
async fn test_validation_uses_extension_not_content() {
    let server = TestServer::start().await;

    // Text content under an accepted name is accepted.
    server
        .upload_ok("notes.png", b"definitely not an image", "text/plain")
        .await;

    // Real PNG bytes under a rejected name are refused.
    let response = server.upload("real.gif", PNG_BYTES, "image/png").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_without_file() {
    let server = TestServer::start().await;

    let response = server
        .upload_form(Form::new().text("caption", "no file here"))
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "No file provided").await;

    let part = Part::bytes(PNG_BYTES.to_vec()).file_name("photo.png");
    let response = server.upload_form(Form::new().part("file", part)).await;
    assert_error(response, StatusCode::BAD_REQUEST, "No file provided").await;

    assert!(server.repository.is_empty().await);
}

#[tokio::test]
async fn test_upload_ignores_extra_fields() {
    let server = TestServer::start().await;

    let part = Part::bytes(PNG_BYTES.to_vec())
        .file_name("photo.png")
        .mime_str("image/png")
        .unwrap();
    let form = Form::new()
        .text("caption", "holiday")
        .part("image", part)
        .text("album", "summer");

    let response = server.upload_form(form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(server.repository.len().await, 1);
}

#[tokio::test]
async fn test_upload_non_multipart_body() {
    let server = TestServer::start().await;

    let response = server
        .client
        .post(server.url("/api/v1/image"))
        .header("origin", ALLOWED_ORIGIN)
        .header("x-api-key", API_KEY)
        .json(&serde_json::json!({ "image": "photo.png" }))
        .send()
        .await
        .unwrap();

    assert_error(response, StatusCode::BAD_REQUEST, "No file provided").await;
}

#[tokio::test]
async fn test_duplicate_uploads_get_distinct_names() {
    let server = TestServer::start().await;

    let first = server.upload_ok("same.png", PNG_BYTES, "image/png").await;
    let second = server.upload_ok("same.png", PNG_BYTES, "image/png").await;

    assert_ne!(first, second);
    assert_eq!(server.repository.len().await, 2);
    assert_eq!(file_count(&server.upload_dir), 2);
}

#[tokio::test]
async fn test_stored_name_is_not_exposed() {
    let server = TestServer::start().await;

    let response = server.upload("photo.png", PNG_BYTES, "image/png").await;
    let body = response.text().await.unwrap();
    let path: Value = serde_json::from_str(&body).unwrap();
    let path = path["data"]["path"].as_str().unwrap();

    let record = server
        .repository
        .find_by_public_filename(public_filename(path))
        .await
        .unwrap()
        .unwrap();
    let stored_name = record.stored_file().stored_name();

    assert_ne!(stored_name, public_filename(path));
    assert!(!body.contains(stored_name.as_str()));
    assert!(server.upload_dir.join(stored_name).exists());
    assert!(!server.upload_dir.join(public_filename(path)).exists());
}

#[tokio::test]
async fn test_retrieve_unknown_image() {
    let server = TestServer::start().await;

    let response = server.get("/image/doesnotexist.png").await;
    assert_error(response, StatusCode::NOT_FOUND, "Image not found").await;
}

#[tokio::test]
async fn test_retrieve_without_filename() {
    let server = TestServer::start().await;

    let response = server.get("/image/").await;
    assert_error(response, StatusCode::BAD_REQUEST, "No filename provided").await;
}

#[tokio::test]
async fn test_retrieve_when_file_removed_externally() {
    let server = TestServer::start().await;
    let path = server.upload_ok("photo.png", PNG_BYTES, "image/png").await;

    let record = server
        .repository
        .find_by_public_filename(public_filename(&path))
        .await
        .unwrap()
        .unwrap();
    std::fs::remove_file(server.upload_dir.join(record.stored_file().stored_name())).unwrap();

    let response = server.get(&path).await;
    assert_error(response, StatusCode::NOT_FOUND, "Image not found").await;

    // The record survives; the caller just cannot reach it.
    assert_eq!(server.repository.len().await, 1);
}

#[tokio::test]
async fn test_delete_removes_file_and_record() {
    let server = TestServer::start().await;
    let path = server.upload_ok("photo.png", PNG_BYTES, "image/png").await;
    assert_eq!(file_count(&server.upload_dir), 1);

    let response = server
        .delete(&format!("/api/v1/image/{}", public_filename(&path)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Image deleted successfully");

    let response = server.get(&path).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(file_count(&server.upload_dir), 0);
    assert!(server.repository.is_empty().await);
}

#[tokio::test]
async fn test_delete_twice() {
    let server = TestServer::start().await;
    let path = server.upload_ok("photo.png", PNG_BYTES, "image/png").await;
    let delete_path = format!("/api/v1/image/{}", public_filename(&path));

    assert_eq!(server.delete(&delete_path).await.status(), StatusCode::OK);
    assert_error(
        server.delete(&delete_path).await,
        StatusCode::NOT_FOUND,
        "Image not found",
    )
    .await;
}

#[tokio::test]
async fn test_delete_unknown_image() {
    let server = TestServer::start().await;

    let response = server.delete("/api/v1/image/doesnotexist.png").await;
    assert_error(response, StatusCode::NOT_FOUND, "Image not found").await;
}

#[tokio::test]
async fn test_delete_without_filename() {
    let server = TestServer::start().await;

    let response = server.delete("/api/v1/image/").await;
    assert_error(response, StatusCode::BAD_REQUEST, "No filename provided").await;
}

#[tokio::test]
async fn test_delete_when_file_already_gone() {
    let server = TestServer::start().await;
    let path = server.upload_ok("photo.png", PNG_BYTES, "image/png").await;

    let record = server
        .repository
        .find_by_public_filename(public_filename(&path))
        .await
        .unwrap()
        .unwrap();
    std::fs::remove_file(server.upload_dir.join(record.stored_file().stored_name())).unwrap();

    let response = server
        .delete(&format!("/api/v1/image/{}", public_filename(&path)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(server.repository.is_empty().await);
}

#[tokio::test]
async fn test_protected_routes_reject_unknown_origins() {
    let server = TestServer::start().await;

    let part = Part::bytes(PNG_BYTES.to_vec()).file_name("photo.png");
    let response = server
        .client
        .post(server.url("/api/v1/image"))
        .header("origin", "https://evil.example")
        .header("x-api-key", API_KEY)
        .multipart(Form::new().part("image", part))
        .send()
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "Endpoint not found").await;

    let response = server
        .client
        .delete(server.url("/api/v1/image/whatever.png"))
        .header("x-api-key", API_KEY)
        .send()
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "Endpoint not found").await;

    assert!(server.repository.is_empty().await);
    assert_eq!(file_count(&server.upload_dir), 0);
}

#[tokio::test]
async fn test_protected_routes_require_api_key() {
    let server = TestServer::start().await;

    let part = Part::bytes(PNG_BYTES.to_vec()).file_name("photo.png");
    let response = server
        .client
        .post(server.url("/api/v1/image"))
        .header("origin", ALLOWED_ORIGIN)
        .multipart(Form::new().part("image", part))
        .send()
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "Unauthorized").await;

    let response = server
        .client
        .delete(server.url("/api/v1/image/whatever.png"))
        .header("origin", ALLOWED_ORIGIN)
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "Unauthorized").await;

    assert!(server.repository.is_empty().await);
}

#[tokio::test]
async fn test_images_served_to_any_origin() {
    let server = TestServer::start().await;
    let path = server.upload_ok("photo.png", PNG_BYTES, "image/png").await;

    let response = server
        .client
        .get(server.url(&path))
        .header("origin", "https://someone-elses-blog.example")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
    assert_eq!(
        response.headers()["cross-origin-resource-policy"],
        "cross-origin"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(server.url("/api/v1/nothing-here"))
        .header("origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "Endpoint not found").await;
}

#[tokio::test]
async fn test_cors_headers_for_allowed_origin() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(server.url("/"))
        .header("origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ALLOWED_ORIGIN);
    assert!(
        headers
            .get_all("vary")
            .iter()
            .any(|v| v.to_str().unwrap().to_ascii_lowercase().contains("origin"))
    );
    assert_eq!(headers["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_preflight() {
    let server = TestServer::start().await;

    let response = server
        .client
        .request(Method::OPTIONS, server.url("/api/v1/image"))
        .header("origin", ALLOWED_ORIGIN)
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ALLOWED_ORIGIN);
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("DELETE"));
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.contains("x-api-key"));

    let response = server
        .client
        .request(Method::OPTIONS, server.url("/api/v1/image"))
        .header("origin", "https://evil.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir)
        .max_upload_bytes(1024usize)
        .build()
        .unwrap();
    let server = TestServer::start_with(config, temp_dir).await;

    let response = server.upload("big.png", &[7u8; 4096], "image/png").await;
    assert_error(response, StatusCode::PAYLOAD_TOO_LARGE, "File too large").await;

    assert!(server.repository.is_empty().await);
    assert_eq!(file_count(&server.upload_dir), 0);
}

/// Repository whose writes always fail.
struct FailingRepository;

#[async_trait]
impl MetadataRepository for FailingRepository {
    async fn create(&self, _record: &ImageRecord) -> ImagebinResult<ImageRecord> {
        Err(DatabaseError::new(DatabaseErrorKind::Query("connection reset".to_string())).into())
    }

    async fn find_by_public_filename(
        &self,
        _public_filename: &str,
    ) -> ImagebinResult<Option<ImageRecord>> {
        Ok(None)
    }

    async fn delete_by_public_filename(&self, _public_filename: &str) -> ImagebinResult<usize> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_persistence_failure_leaves_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir).build().unwrap();
    let upload_dir = config.upload_dir().clone();
    let base_url = serve(config, FailingRepository).await;

    let part = Part::bytes(PNG_BYTES.to_vec()).file_name("photo.png");
    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/image", base_url))
        .header("origin", ALLOWED_ORIGIN)
        .header("x-api-key", API_KEY)
        .multipart(Form::new().part("image", part))
        .send()
        .await
        .unwrap();

    assert_error(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Could not save image",
    )
    .await;
    assert!(upload_dir.is_dir());
    assert_eq!(file_count(&upload_dir), 0);
}

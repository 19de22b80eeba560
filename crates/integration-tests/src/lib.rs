//! Shared harness for the API integration tests: a full router wired over
//! the in-memory adapters, plus request helpers.

#![cfg(feature = "web-axum")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use api_adapters::state::AppState;
use auth_adapters::SimpleIdentityProvider;
use services::accounts::{AccountService, CredentialPolicy};
use services::bulletins::BulletinService;
use services::directory::DirectoryService;
use services::media::UploadService;
use storage_adapters::media::MemoryMediaStore;
use storage_adapters::memory::MemoryCampusRepo;

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "campus-admin-test-boundary";

/// The assembled application plus handles onto its backing stores, so
/// tests can assert on state the API does not expose.
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryCampusRepo>,
    pub identities: Arc<SimpleIdentityProvider>,
    pub media: Arc<MemoryMediaStore>,
}

/// Wires the router exactly the way the binary does, over in-memory
/// adapters and the fixed starter password.
pub fn test_app() -> TestApp {
    let repo = Arc::new(MemoryCampusRepo::new());
    let identities = Arc::new(SimpleIdentityProvider::new());
    let media = Arc::new(MemoryMediaStore::new("https://cdn.campus.example"));

    let state = AppState {
        directory: DirectoryService::new(repo.clone()),
        accounts: AccountService::new(
            repo.clone(),
            identities.clone(),
            CredentialPolicy::Fixed("campus".to_string()),
        ),
        bulletins: BulletinService::new(repo.clone()),
        uploads: UploadService::new(media.clone()),
    };

    TestApp {
        router: api_adapters::router(state),
        repo,
        identities,
        media,
    }
}

/// Sends one request and decodes the JSON response (if any).
pub async fn request(
    router: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Sends a multipart upload to `/upload` with the given `images` parts
/// (`(filename, content type, bytes)`).
pub async fn upload(
    router: &Router,
    parts: &[(&str, &str, &[u8])],
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Builds a multipart body with one `images` part per entry.
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (file_name, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

// file: tests/common/mod.rs
// description: local fake backend recording every request it receives
// reference: axum test server on an ephemeral port
#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "tok123";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone, Default)]
pub struct Backend {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Backend {
    /// Starts the fake backend and returns it with its base URL.
    pub async fn spawn() -> (Self, String) {
        let backend = Backend::default();
        let router = Router::new().fallback(handle).with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (backend, format!("http://{}", addr))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests().last().cloned().expect("no request recorded")
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let request = RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    backend.requests.lock().unwrap().push(request.clone());

    let authorized = request.authorization.as_deref() == Some("Bearer tok123");
    let unauthorized = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Could not validate credentials"})),
        )
            .into_response()
    };

    match (method.as_str(), request.path.as_str()) {
        ("GET", "/health") => Json(json!({"status": "ok"})).into_response(),
        ("POST", "/auth/login") => {
            let payload = request.json();
            if payload["password"] == "x" {
                Json(json!({"access_token": TOKEN, "token_type": "bearer"})).into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Incorrect tenant, email, or password"})),
                )
                    .into_response()
            }
        }
        ("POST", "/upload") => {
            if !authorized {
                return unauthorized();
            }
            Json(json!({
                "document_id": "D1",
                "tenant_id": "T1",
                "filename": "notes.txt",
                "status": "ready"
            }))
            .into_response()
        }
        ("POST", "/query") => {
            if !authorized {
                return unauthorized();
            }
            if request.json()["question"] == "explode" {
                return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
            }
            Json(json!({
                "answer": "X is Y",
                "sources": [{"document_id": "D1", "chunk_index": 0, "text": "..."}]
            }))
            .into_response()
        }
        ("GET", "/tenants") => Json(json!([
            {"id": "6f1c1f4e-8a9b-4d55-9a43-6c7a9f1a2b3c", "name": "Acme"}
        ]))
        .into_response(),
        ("POST", "/tenants") => {
            let name = request.json()["name"].clone();
            Json(json!({"id": "9b2d7c1a-0000-4000-8000-000000000001", "name": name}))
                .into_response()
        }
        ("POST", "/users") => {
            let payload = request.json();
            Json(json!({
                "id": "0c6d8f7e-0000-4000-8000-000000000002",
                "tenant_id": payload["tenant_id"],
                "email": payload["email"],
                "role": payload["role"]
            }))
            .into_response()
        }
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

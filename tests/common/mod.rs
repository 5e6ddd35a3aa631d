//! In-process stub of the remote document-processing API.
//!
//! Serves `POST /build`, `POST /sign`, `GET /health` and a document download
//! at `GET /files/document.docx` on an ephemeral localhost port and records every request it sees, multipart parts
//! included, so tests can assert on exactly what went over the wire.

#![allow(dead_code)]

use axum::extract::{Multipart, OriginalUri, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use dws_addin::{ApiClient, ClientConfig, CredentialStore};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const KEY: &str = "test-key";
pub const DOWNLOAD_PATH: &str = "/files/document.docx";

#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub value: Vec<u8>,
}

impl RecordedPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub parts: Vec<RecordedPart>,
}

impl Recorded {
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn part(&self, name: &str) -> Option<&RecordedPart> {
        self.parts.iter().find(|p| p.name == name)
    }
}

/// How the stub answers.
#[derive(Debug, Clone)]
pub struct StubBehaviour {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub delay: Duration,
    pub health_delay: Duration,
    /// Key the health endpoint accepts; anything else gets 401.
    pub accepted_key: &'static str,
}

impl Default for StubBehaviour {
    fn default() -> Self {
        Self {
            status: 200,
            content_type: "application/pdf",
            body: b"%PDF-1.7 stub".to_vec(),
            delay: Duration::ZERO,
            health_delay: Duration::ZERO,
            accepted_key: KEY,
        }
    }
}

impl StubBehaviour {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }
}

#[derive(Clone)]
struct StubState {
    behaviour: StubBehaviour,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct Stub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Stub {
    pub async fn start(behaviour: StubBehaviour) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            behaviour,
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/build", post(operation))
            .route("/sign", post(operation))
            .route("/health", get(health))
            .route(DOWNLOAD_PATH, get(download))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// POSTs to the operation endpoints.
    pub fn operations(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    /// Where the stub serves its document body.
    pub fn download_url(&self) -> String {
        format!("{}{}", self.base_url, DOWNLOAD_PATH)
    }

    /// GET requests against the download route.
    pub fn downloads(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == DOWNLOAD_PATH)
            .collect()
    }

    pub fn config(&self) -> ClientConfig {
        config_for(&self.base_url)
    }

    pub fn client(&self, key: Option<&str>) -> ApiClient {
        client_for(&self.base_url, key)
    }
}

pub fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig::builder()
        .base_url(base_url)
        .request_timeout(Duration::from_secs(5))
        .probe_timeout(Duration::from_secs(1))
        .credential_from_env(false)
        .build()
        .expect("valid test config")
}

pub fn client_for(base_url: &str, key: Option<&str>) -> ApiClient {
    let store = CredentialStore::new();
    if let Some(key) = key {
        store.set(key);
    }
    ApiClient::new(config_for(base_url), Arc::new(store)).expect("client")
}

/// A base URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Minimal bytes that pass the OOXML container sniff.
pub fn docx_bytes() -> Vec<u8> {
    b"PK\x03\x04word/document.xml".to_vec()
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn operation(
    State(state): State<StubState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let value = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(RecordedPart {
            name,
            file_name,
            content_type,
            value,
        });
    }

    state.requests.lock().unwrap().push(Recorded {
        method: "POST".into(),
        path: uri.path().to_string(),
        authorization: authorization(&headers),
        parts,
    });

    let b = &state.behaviour;
    if !b.delay.is_zero() {
        tokio::time::sleep(b.delay).await;
    }
    let status = StatusCode::from_u16(b.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, b.content_type)], b.body.clone()).into_response()
}

async fn health(State(state): State<StubState>, headers: HeaderMap) -> StatusCode {
    let auth = authorization(&headers);
    state.requests.lock().unwrap().push(Recorded {
        method: "GET".into(),
        path: "/health".into(),
        authorization: auth.clone(),
        parts: Vec::new(),
    });

    let b = &state.behaviour;
    if !b.health_delay.is_zero() {
        tokio::time::sleep(b.health_delay).await;
    }
    if auth.as_deref() == Some(format!("Bearer {}", b.accepted_key).as_str()) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

/// Serves the configured body as a document download, same status and delay
/// as the operation endpoints.
async fn download(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.requests.lock().unwrap().push(Recorded {
        method: "GET".into(),
        path: DOWNLOAD_PATH.into(),
        authorization: authorization(&headers),
        parts: Vec::new(),
    });

    let b = &state.behaviour;
    if !b.delay.is_zero() {
        tokio::time::sleep(b.delay).await;
    }
    let status = StatusCode::from_u16(b.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, b.content_type)], b.body.clone()).into_response()
}

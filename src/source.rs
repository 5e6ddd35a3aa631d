//! Document sources: where the bytes of the active document come from.
//!
//! In the Word host the document is handed over by the Office runtime; here
//! that capability is the [`DocumentSource`] trait, with adapters for
//! in-memory buffers, local files and HTTP(S) URLs. A source is asked for
//! fresh bytes on every operation and nothing is cached between calls.
//!
//! A source may legitimately have nothing to give (no active document, an
//! empty file). That is `Ok(None)`, not an error; the orchestrator turns it
//! into a "Failed to get document content" result.

use crate::error::DwsError;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// ZIP local-file header; every OOXML container starts with it.
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// The serialized document at the moment it was retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBytes(Vec<u8>);

impl DocumentBytes {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for DocumentBytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for DocumentBytes {
    fn from(v: &[u8]) -> Self {
        Self(v.to_vec())
    }
}

/// Basic facts about the active document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub page_count: usize,
}

/// Yields the active document's bytes.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Retrieve the current document, or `None` when there is nothing to send.
    async fn fetch(&self) -> Result<Option<DocumentBytes>, DwsError>;

    /// Describe the current document, when the source can.
    async fn info(&self) -> Result<Option<DocumentInfo>, DwsError> {
        Ok(None)
    }
}

// ── In-memory ────────────────────────────────────────────────────────────

/// A source backed by a buffer held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Option<Vec<u8>>,
    info: Option<DocumentInfo>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
            info: None,
        }
    }

    /// A source with no active document.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = Some(info);
        self
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn fetch(&self) -> Result<Option<DocumentBytes>, DwsError> {
        Ok(self.bytes.clone().map(DocumentBytes::from))
    }

    async fn info(&self) -> Result<Option<DocumentInfo>, DwsError> {
        Ok(self.info.clone())
    }
}

// ── Local file ───────────────────────────────────────────────────────────

/// A `.docx` (or any) file on disk, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self) -> Result<Option<DocumentBytes>, DwsError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DwsError::FileNotFound {
                path: self.path.clone(),
            },
            std::io::ErrorKind::PermissionDenied => DwsError::PermissionDenied {
                path: self.path.clone(),
            },
            _ => DwsError::Internal(format!("reading '{}': {}", self.path.display(), e)),
        })?;

        if bytes.is_empty() {
            debug!("Document file is empty: {}", self.path.display());
            return Ok(None);
        }
        check_container(&bytes, &self.path.display().to_string());

        debug!("Read {} bytes from {}", bytes.len(), self.path.display());
        Ok(Some(DocumentBytes::new(bytes)))
    }

    async fn info(&self) -> Result<Option<DocumentInfo>, DwsError> {
        if !matches!(tokio::fs::try_exists(&self.path).await, Ok(true)) {
            return Ok(None);
        }
        let title = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled Document".to_string());
        Ok(Some(DocumentInfo {
            title,
            author: "Unknown Author".to_string(),
            page_count: 1,
        }))
    }
}

// ── Remote URL ───────────────────────────────────────────────────────────

/// A document served over HTTP(S), downloaded on every fetch.
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: String,
    timeout_secs: u64,
    http: reqwest::Client,
}

impl UrlSource {
    /// Build the source and its HTTP client. Every download shares the client.
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, DwsError> {
        let url = url.into();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DwsError::DownloadFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            url,
            timeout_secs,
            http,
        })
    }

    fn download_failed(&self, reason: impl Into<String>) -> DwsError {
        DwsError::DownloadFailed {
            url: self.url.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for UrlSource {
    async fn fetch(&self) -> Result<Option<DocumentBytes>, DwsError> {
        info!("Downloading document from: {}", self.url);

        let response = self.http.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                DwsError::DownloadTimeout {
                    url: self.url.clone(),
                    secs: self.timeout_secs,
                }
            } else {
                self.download_failed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(self.download_failed(format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.download_failed(e.to_string()))?;

        if bytes.is_empty() {
            return Ok(None);
        }
        check_container(&bytes, &self.url);

        info!("Downloaded {} bytes", bytes.len());
        Ok(Some(DocumentBytes::new(bytes.to_vec())))
    }

    async fn info(&self) -> Result<Option<DocumentInfo>, DwsError> {
        let title = reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|mut s| s.next_back().map(str::to_string))
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.url.clone());
        Ok(Some(DocumentInfo {
            title,
            author: "Unknown Author".to_string(),
            page_count: 1,
        }))
    }
}

// ── Resolution ───────────────────────────────────────────────────────────

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Pick a source for a user-supplied path or URL.
pub fn resolve_source(
    input: &str,
    download_timeout_secs: u64,
) -> Result<Box<dyn DocumentSource>, DwsError> {
    if is_url(input) {
        Ok(Box::new(UrlSource::new(input, download_timeout_secs)?))
    } else {
        Ok(Box::new(FileSource::new(input)))
    }
}

/// The remote service decides what it accepts; a non-ZIP body is only logged.
fn check_container(bytes: &[u8], origin: &str) {
    if bytes.len() < ZIP_MAGIC.len() || &bytes[..ZIP_MAGIC.len()] != ZIP_MAGIC {
        warn!("{} does not look like an OOXML container; sending anyway", origin);
    }
}

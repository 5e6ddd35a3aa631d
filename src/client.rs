//! HTTP client for the remote document-processing API.
//!
//! Each operation is exactly one authenticated multipart POST and exactly one
//! [`ProcessingResult`]; there is no retry, no backoff and no streaming. The
//! only `Err` this module returns is [`DwsError::MissingCredential`], raised
//! before any I/O when the caller skipped the credential check.
//!
//! ## Result mapping
//!
//! | Transport outcome | Result |
//! |-------------------|--------|
//! | HTTP 200 | success, `fileUrl` + `data` |
//! | other non-error status, including 3xx | `API returned status <code>` |
//! | 4xx / 5xx | `API error: <code> - <reason>` |
//! | sent, no response (connect, timeout, truncated body) | `Network error: No response received` |
//! | request could not be built | `Request error: <message>` |
//!
//! Redirects are not followed, so a 3xx reaches the mapping above instead of
//! surfacing as a transport error.

use crate::config::ClientConfig;
use crate::credential::CredentialStore;
use crate::error::DwsError;
use crate::operation::{OperationRequest, SignatureOptions, HEALTH_PATH};
use crate::result::ProcessingResult;
use crate::source::DocumentBytes;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Message reported when a request was sent but no response arrived.
pub const NO_RESPONSE: &str = "Network error: No response received";

/// Client for the convert / sign / transform endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    credentials: Arc<CredentialStore>,
}

impl ApiClient {
    /// Create a client reading its credential from `credentials`.
    pub fn new(config: ClientConfig, credentials: Arc<CredentialStore>) -> Result<Self, DwsError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| DwsError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        debug!(
            base_url = %config.base_url,
            request_timeout = ?config.request_timeout,
            probe_timeout = ?config.probe_timeout,
            "API client initialised"
        );

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Convert the document to `target_format` (e.g. `"pdf"`).
    pub async fn convert_document(
        &self,
        document: impl Into<DocumentBytes>,
        target_format: &str,
    ) -> Result<ProcessingResult, DwsError> {
        self.execute(document, &OperationRequest::convert(target_format))
            .await
    }

    /// Digitally sign the document.
    pub async fn sign_document(
        &self,
        document: impl Into<DocumentBytes>,
        options: &SignatureOptions,
    ) -> Result<ProcessingResult, DwsError> {
        self.execute(document, &OperationRequest::sign(options.clone()))
            .await
    }

    /// Apply free-form processing instructions to the document.
    pub async fn process_document(
        &self,
        document: impl Into<DocumentBytes>,
        instructions: &str,
    ) -> Result<ProcessingResult, DwsError> {
        self.execute(document, &OperationRequest::transform(instructions))
            .await
    }

    /// Send one operation and map the outcome.
    ///
    /// # Errors
    /// Only [`DwsError::MissingCredential`]; every other failure is a
    /// failed [`ProcessingResult`].
    pub async fn execute(
        &self,
        document: impl Into<DocumentBytes>,
        request: &OperationRequest,
    ) -> Result<ProcessingResult, DwsError> {
        let credential = self.credentials.get().ok_or(DwsError::MissingCredential)?;
        let document = document.into();

        if let Err(reason) = request.validate() {
            warn!("{} request rejected locally: {}", request.label(), reason);
            return Ok(ProcessingResult::failure(format!("Request error: {reason}")));
        }

        let url = self.config.endpoint(request.path());
        let size = document.len();

        let form = match self.build_form(document, request) {
            Ok(form) => form,
            Err(e) => return Ok(ProcessingResult::failure(format!("Request error: {e}"))),
        };

        info!("{}: posting {} bytes to {}", request.label(), size, url);
        let start = Instant::now();

        let sent = self
            .http
            .post(&url)
            .bearer_auth(credential.expose())
            .timeout(self.config.request_timeout)
            .multipart(form)
            .send()
            .await;

        let result = match sent {
            Ok(response) => self.interpret(response).await,
            Err(e) => {
                warn!("API call to {} failed: {}", request.path(), e);
                ProcessingResult::failure(describe_send_error(&e))
            }
        };

        debug!(
            success = result.is_success(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "{} finished",
            request.label()
        );
        Ok(result)
    }

    /// Authenticated GET on the health path. Any failure is `false`.
    pub async fn test_connection(&self) -> bool {
        let Some(credential) = self.credentials.get() else {
            debug!("Connectivity probe skipped: no credential");
            return false;
        };

        let url = self.config.endpoint(HEALTH_PATH);
        match self
            .http
            .get(&url)
            .bearer_auth(credential.expose())
            .timeout(self.config.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let ok = response.status() == StatusCode::OK;
                debug!(status = response.status().as_u16(), "Connectivity probe answered");
                ok
            }
            Err(e) => {
                warn!("API connection test failed: {}", e);
                false
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn build_form(
        &self,
        document: DocumentBytes,
        request: &OperationRequest,
    ) -> Result<Form, reqwest::Error> {
        let file = Part::bytes(document.into_vec())
            .file_name(self.config.file_name.clone())
            .mime_str(&self.config.file_content_type)?;

        let mut form = Form::new().part("file", file);
        for (name, value) in request.form_fields() {
            debug!(field = name, "Adding form field");
            form = form.text(name, value);
        }
        Ok(form)
    }

    async fn interpret(&self, response: Response) -> ProcessingResult {
        let status = response.status();
        debug!(status = status.as_u16(), "Received response");

        if status == StatusCode::OK {
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            return match response.bytes().await {
                Ok(body) => {
                    let (file_url, data) = self.success_payload(content_type, &body);
                    ProcessingResult::success(Some(file_url), Some(data)).with_body(body.to_vec())
                }
                Err(e) => {
                    warn!("Failed to read response body: {}", e);
                    ProcessingResult::failure(NO_RESPONSE)
                }
            };
        }

        if status.is_client_error() || status.is_server_error() {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            return ProcessingResult::failure(format!(
                "API error: {} - {}",
                status.as_u16(),
                reason
            ));
        }

        ProcessingResult::failure(format!("API returned status {}", status.as_u16()))
    }

    /// Derive the download locator and payload from a 200 body.
    ///
    /// A JSON object is passed through and its `url` used when present;
    /// a binary body is described instead.
    fn success_payload(&self, content_type: Option<String>, body: &[u8]) -> (String, Value) {
        if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
            let url = map
                .get("url")
                .and_then(Value::as_str)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| self.placeholder_url());
            return (url, Value::Object(map));
        }

        let url = self.placeholder_url();
        let data = json!({
            "url": url,
            "contentType": content_type,
            "size": body.len(),
        });
        (url, data)
    }

    fn placeholder_url(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.config.endpoint(&format!("download/{millis}"))
    }
}

/// Map a `send()` failure to its reported message.
fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        format!("Request error: {e}")
    } else {
        NO_RESPONSE.to_string()
    }
}

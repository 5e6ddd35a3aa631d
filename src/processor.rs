//! Processing orchestrator: fetch the document, hand it to the API client,
//! return what comes back.
//!
//! This layer owns no error taxonomy of its own. A missing document becomes
//! `"Failed to get document content"`; any `Err` from the source or the
//! client becomes `"<Operation> error: <message>"`. Nothing is returned as
//! `Err`, so presentation code only ever deals with a [`ProcessingResult`].

use crate::client::ApiClient;
use crate::error::DwsError;
use crate::operation::{OperationRequest, SignatureOptions};
use crate::result::ProcessingResult;
use crate::source::{DocumentInfo, DocumentSource};
use std::sync::Arc;
use tracing::{info, warn};

/// Message reported when the source yields no document.
pub const NO_DOCUMENT: &str = "Failed to get document content";

/// Runs operations against the document exposed by a [`DocumentSource`].
#[derive(Clone)]
pub struct DocumentProcessor {
    client: Arc<ApiClient>,
    source: Arc<dyn DocumentSource>,
}

impl std::fmt::Debug for DocumentProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentProcessor")
            .field("client", &self.client)
            .field("source", &"<dyn DocumentSource>")
            .finish()
    }
}

impl DocumentProcessor {
    pub fn new(client: Arc<ApiClient>, source: Arc<dyn DocumentSource>) -> Self {
        Self { client, source }
    }

    pub async fn convert(&self, target_format: &str) -> ProcessingResult {
        self.run(&OperationRequest::convert(target_format)).await
    }

    pub async fn sign(&self, options: &SignatureOptions) -> ProcessingResult {
        self.run(&OperationRequest::sign(options.clone())).await
    }

    pub async fn transform(&self, instructions: &str) -> ProcessingResult {
        self.run(&OperationRequest::transform(instructions)).await
    }

    /// Fetch → send → report.
    pub async fn run(&self, request: &OperationRequest) -> ProcessingResult {
        info!("{} requested", request.label());
        match self.try_run(request).await {
            Ok(result) => result,
            Err(e) => {
                warn!("{} failed before completion: {}", request.label(), e);
                ProcessingResult::failure(format!("{} error: {}", request.label(), e))
            }
        }
    }

    async fn try_run(&self, request: &OperationRequest) -> Result<ProcessingResult, DwsError> {
        let Some(document) = self.source.fetch().await? else {
            warn!("{}: no document content available", request.label());
            return Ok(ProcessingResult::failure(NO_DOCUMENT));
        };
        self.client.execute(document, request).await
    }

    /// Describe the active document, if the source can.
    pub async fn document_info(&self) -> Result<Option<DocumentInfo>, DwsError> {
        self.source.info().await
    }
}

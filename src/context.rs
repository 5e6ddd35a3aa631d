//! Application context: the credential store, API client and orchestrator,
//! wired once and handed to whichever layer needs them.
//!
//! Also hosts the two credential flows every front end needs: saving a new
//! key (store, then probe) and checking readiness before an operation.

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::credential::CredentialStore;
use crate::error::DwsError;
use crate::processor::DocumentProcessor;
use crate::source::DocumentSource;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of [`AppContext::save_credential`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// Blank input; nothing was stored.
    Empty,
    /// Stored and accepted by the probe.
    Valid,
    /// Stored but the probe failed.
    Invalid,
}

#[derive(Debug, Clone)]
pub struct AppContext {
    credentials: Arc<CredentialStore>,
    client: Arc<ApiClient>,
    processor: DocumentProcessor,
}

impl AppContext {
    pub fn new(config: ClientConfig, source: Arc<dyn DocumentSource>) -> Result<Self, DwsError> {
        let credentials = Arc::new(if config.credential_from_env {
            CredentialStore::from_env()
        } else {
            CredentialStore::new()
        });
        let client = Arc::new(ApiClient::new(config, Arc::clone(&credentials))?);
        let processor = DocumentProcessor::new(Arc::clone(&client), source);

        info!(
            has_credential = credentials.has_credential(),
            "Context initialised"
        );
        Ok(Self {
            credentials,
            client,
            processor,
        })
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn processor(&self) -> &DocumentProcessor {
        &self.processor
    }

    /// Store `token` (trimmed) and validate it against the health endpoint.
    ///
    /// An invalid key stays stored so the caller can decide whether to clear it.
    pub async fn save_credential(&self, token: &str) -> CredentialCheck {
        let token = token.trim();
        if token.is_empty() {
            return CredentialCheck::Empty;
        }
        self.credentials.set(token);
        if self.client.test_connection().await {
            info!("API key saved and validated");
            CredentialCheck::Valid
        } else {
            warn!("API key rejected by connectivity probe");
            CredentialCheck::Invalid
        }
    }

    /// Fail unless a credential is set and the service accepts it.
    pub async fn ensure_ready(&self) -> Result<(), DwsError> {
        if !self.credentials.has_credential() {
            return Err(DwsError::MissingCredential);
        }
        if !self.client.test_connection().await {
            return Err(DwsError::InvalidCredential);
        }
        Ok(())
    }
}

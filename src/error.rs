//! Error types for the dws-addin library.
//!
//! Two failure channels exist and they are kept apart on purpose:
//!
//! * [`DwsError`] — **Fatal**: something stopped the library before a
//!   request could be judged by the remote service (no credential, the
//!   document could not be read, a bad configuration). Returned as
//!   `Err(DwsError)`.
//!
//! * [`crate::result::ProcessingResult`] — **Reported**: the operation ran
//!   and the outcome (accepted, rejected, unreachable) is data, not an
//!   error. Every transport-level failure ends up here.
//!
//! The API client only ever returns `Err(DwsError::MissingCredential)`; the
//! orchestrator folds every remaining `DwsError` into a failed
//! `ProcessingResult`, so presentation code never sees raw transport errors.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the dws-addin library.
#[derive(Debug, Error)]
pub enum DwsError {
    // ── Credential errors ─────────────────────────────────────────────────
    /// An operation was attempted before a credential was set.
    ///
    /// Callers are expected to check
    /// [`crate::credential::CredentialStore::has_credential`] first.
    #[error("API key not set")]
    MissingCredential,

    /// The connectivity probe rejected the stored credential.
    #[error("API key is invalid. Please check and save again.")]
    InvalidCredential,

    // ── Document source errors ────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Document file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// Download of a URL-backed document failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_display() {
        assert_eq!(DwsError::MissingCredential.to_string(), "API key not set");
    }

    #[test]
    fn file_not_found_display() {
        let e = DwsError::FileNotFound {
            path: PathBuf::from("/tmp/nope.docx"),
        };
        assert!(e.to_string().contains("nope.docx"), "got: {e}");
    }

    #[test]
    fn download_timeout_display() {
        let e = DwsError::DownloadTimeout {
            url: "https://example.com/a.docx".into(),
            secs: 7,
        };
        let msg = e.to_string();
        assert!(msg.contains("7s"));
        assert!(msg.contains("example.com"));
    }
}

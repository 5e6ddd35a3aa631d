//! The uniform success/failure envelope every operation returns.
//!
//! ## Why private fields?
//!
//! The envelope has one invariant worth protecting: a successful result never
//! carries an error, and a failed result always carries a non-empty error and
//! nothing else. Constructing it only through [`ProcessingResult::success`]
//! and [`ProcessingResult::failure`] makes the invalid combinations
//! unrepresentable.

use serde::Serialize;
use serde_json::Value;

/// Outcome of a convert / sign / transform operation.
///
/// Serialises as `{"success": .., "fileUrl": .., "data": .., "error": ..}`
/// with absent fields skipped. The raw response body of a successful call is
/// kept alongside for callers that want to save it, but is not serialised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip)]
    body: Option<Vec<u8>>,
}

impl ProcessingResult {
    /// A successful outcome.
    pub fn success(file_url: Option<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            file_url,
            data,
            error: None,
            body: None,
        }
    }

    /// A failed outcome. An empty message is replaced so that a failure is
    /// never silent.
    pub fn failure(error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error = "Unknown error".to_string();
        }
        Self {
            success: false,
            file_url: None,
            data: None,
            error: Some(error),
            body: None,
        }
    }

    /// Attach the raw response body. Ignored on failures.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        if self.success {
            self.body = Some(body);
        }
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn file_url(&self) -> Option<&str> {
        self.file_url.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Raw bytes returned by the service, when the call succeeded.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

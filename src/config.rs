//! Configuration for the document-processing client.
//!
//! Every knob the client reads lives in [`ClientConfig`], built through
//! [`ClientConfigBuilder`]. The defaults point at the public Nutrient DWS
//! endpoint with the timeouts the Word add-in has always used, so most
//! callers only ever touch the credential.

use crate::error::DwsError;
use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.nutrient.io";

/// Environment variable consulted for a credential at start-up.
pub const API_KEY_ENV: &str = "NUTRIENT_DWS_API_KEY";

/// Content type of the `file` part: the host hands us an OOXML container.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Configuration for [`crate::client::ApiClient`].
///
/// # Example
/// ```rust
/// use dws_addin::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .base_url("https://api.nutrient.io")
///     .request_timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// assert_eq!(config.request_timeout, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all operation paths are appended to. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// `User-Agent` sent with every request.
    pub user_agent: String,

    /// Deadline for `build` / `sign` requests, body included. Default: 30 s.
    ///
    /// Conversions of large documents are slow on the remote side; when the
    /// deadline passes the call is reported as a no-response failure.
    pub request_timeout: Duration,

    /// Deadline for the `health` probe. Default: 5 s.
    pub probe_timeout: Duration,

    /// File name announced for the document part. Default: `document.docx`.
    pub file_name: String,

    /// Content type announced for the document part. Default: [`DOCX_CONTENT_TYPE`].
    pub file_content_type: String,

    /// Seed the credential store from [`API_KEY_ENV`] when the context is
    /// created. Default: true.
    pub credential_from_env: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("dws-addin/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            file_name: "document.docx".to_string(),
            file_content_type: DOCX_CONTENT_TYPE.to_string(),
            credential_from_env: true,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL for an operation path segment such as `build` or `health`.
    pub fn endpoint(&self, segment: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), segment)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    pub fn file_content_type(mut self, mime: impl Into<String>) -> Self {
        self.config.file_content_type = mime.into();
        self
    }

    pub fn credential_from_env(mut self, v: bool) -> Self {
        self.config.credential_from_env = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, DwsError> {
        let c = &self.config;
        let url = reqwest::Url::parse(&c.base_url).map_err(|e| {
            DwsError::InvalidConfig(format!("base URL '{}' is not valid: {}", c.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DwsError::InvalidConfig(format!(
                "base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if c.request_timeout.is_zero() || c.probe_timeout.is_zero() {
            return Err(DwsError::InvalidConfig("timeouts must be non-zero".into()));
        }
        if c.file_name.trim().is_empty() {
            return Err(DwsError::InvalidConfig("file name must not be empty".into()));
        }
        Ok(self.config)
    }
}

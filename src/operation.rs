//! The three operations the remote service understands and their wire shape.
//!
//! Each [`OperationRequest`] knows which path segment it is posted to and
//! which multipart text fields accompany the document. Optional fields are
//! included iff the caller supplied a value: `None` omits the part entirely,
//! while `Some(false)` or `Some(String::new())` is still sent.

use serde::Serialize;

/// Path segment for conversion and free-form transforms.
pub const BUILD_PATH: &str = "build";
/// Path segment for digital signing.
pub const SIGN_PATH: &str = "sign";
/// Path segment for the connectivity probe.
pub const HEALTH_PATH: &str = "health";

/// Options for a digital signature.
///
/// ```rust
/// use dws_addin::SignatureOptions;
///
/// let opts = SignatureOptions::new("Alice").page(2).reason("Approved");
/// assert_eq!(opts.signer_name, "Alice");
/// assert_eq!(opts.page, Some(2));
/// assert!(opts.location.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureOptions {
    pub signer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl SignatureOptions {
    pub fn new(signer_name: impl Into<String>) -> Self {
        Self {
            signer_name: signer_name.into(),
            ..Default::default()
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Position of a visible signature on the page.
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

/// One request to the remote service. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OperationRequest {
    /// Convert the document to another format (`pdf`, `html`, ...).
    #[serde(rename_all = "camelCase")]
    Convert { target_format: String },
    /// Apply a digital signature.
    Sign(SignatureOptions),
    /// Free-form, instruction-driven transform.
    Transform { instructions: String },
}

impl OperationRequest {
    pub fn convert(target_format: impl Into<String>) -> Self {
        Self::Convert {
            target_format: target_format.into(),
        }
    }

    pub fn sign(options: SignatureOptions) -> Self {
        Self::Sign(options)
    }

    pub fn transform(instructions: impl Into<String>) -> Self {
        Self::Transform {
            instructions: instructions.into(),
        }
    }

    /// Path segment under the base URL this request is posted to.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Convert { .. } | Self::Transform { .. } => BUILD_PATH,
            Self::Sign(_) => SIGN_PATH,
        }
    }

    /// Label used when an unexpected failure is folded into a result,
    /// e.g. `"Conversion error: ..."`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Convert { .. } => "Conversion",
            Self::Sign(_) => "Signing",
            Self::Transform { .. } => "Processing",
        }
    }

    /// Check required fields. The message becomes a `Request error: ...`.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Convert { target_format } if target_format.trim().is_empty() => {
                Err("target format must not be empty".into())
            }
            Self::Sign(opts) if opts.signer_name.trim().is_empty() => {
                Err("signer name must not be empty".into())
            }
            Self::Transform { instructions } if instructions.trim().is_empty() => {
                Err("instructions must not be empty".into())
            }
            _ => Ok(()),
        }
    }

    /// Text parts sent alongside the `file` part, in wire order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Convert { target_format } => {
                vec![("instructions", format!("convert to {target_format}"))]
            }
            Self::Transform { instructions } => vec![("instructions", instructions.clone())],
            Self::Sign(opts) => {
                let mut fields = vec![("signerName", opts.signer_name.clone())];
                if let Some(ref reason) = opts.reason {
                    fields.push(("reason", reason.clone()));
                }
                if let Some(ref location) = opts.location {
                    fields.push(("location", location.clone()));
                }
                if let Some(visible) = opts.visible {
                    fields.push(("visible", visible.to_string()));
                }
                if let Some(page) = opts.page {
                    fields.push(("page", page.to_string()));
                }
                if let Some(x) = opts.x {
                    fields.push(("x", x.to_string()));
                }
                if let Some(y) = opts.y {
                    fields.push(("y", y.to_string()));
                }
                fields
            }
        }
    }
}

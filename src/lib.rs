//! # dws-addin
//!
//! Send the active Word document to a remote document-processing API and
//! report what happened.
//!
//! ## Flow
//!
//! ```text
//! caller
//!  │
//!  ├─ 1. Source     fetch the document bytes (file, URL, memory, host)
//!  ├─ 2. Client     one authenticated multipart POST: build | sign
//!  └─ 3. Result     ProcessingResult { success, fileUrl, data, error }
//! ```
//!
//! Three operations are supported: **convert** to another format,
//! **sign** digitally, and **transform** with free-form instructions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dws_addin::{AppContext, ClientConfig, FileSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential picked up from NUTRIENT_DWS_API_KEY
//!     let ctx = AppContext::new(
//!         ClientConfig::default(),
//!         Arc::new(FileSource::new("report.docx")),
//!     )?;
//!     ctx.ensure_ready().await?;
//!
//!     let result = ctx.processor().convert("pdf").await;
//!     match result.error() {
//!         None => println!("done: {}", result.file_url().unwrap_or_default()),
//!         Some(e) => eprintln!("failed: {e}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `dws` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod context;
pub mod credential;
pub mod error;
pub mod operation;
pub mod processor;
pub mod result;
pub mod source;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use context::{AppContext, CredentialCheck};
pub use credential::{Credential, CredentialStore};
pub use error::DwsError;
pub use operation::{OperationRequest, SignatureOptions};
pub use processor::DocumentProcessor;
pub use result::ProcessingResult;
pub use source::{
    resolve_source, DocumentBytes, DocumentInfo, DocumentSource, FileSource, MemorySource,
    UrlSource,
};

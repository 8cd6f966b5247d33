//! Byepass - single-page web archiver
//!
//! This crate retrieves one web page through a controlled,
//! script-disabled headless Chromium session and returns one of three
//! artifact representations: a sanitized self-contained HTML snapshot,
//! a full-page PNG, or a paginated print PDF.
//!
//! # Architecture
//!
//! ```text
//! Caller ──▶ Capture Pipeline ──▶ Capture Session (CDP)
//!                 │                    │
//!                 │              Network Policy Filter
//!                 │              Navigator (30s, DOM parse)
//!                 ▼                    ▼
//!          Content Extractor ──▶ Snapshot Rewriter (html only)
//!                 │
//!                 ▼
//!          archive.html / archive.png / archive.pdf
//! ```
//!
//! One capture owns one browser process; the session is released on
//! every exit path. The target page's scripts never execute: script
//! execution is disabled session-wide, the request filter blocks the
//! script category, and the rewriter strips whatever markup still
//! carries.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use byepass::capture::{perform_capture, CaptureKind, CaptureRequest};
//! use byepass::session::SessionConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = CaptureRequest::from_user_input("example.com", CaptureKind::Document);
//!     let artifact = perform_capture(&request, &SessionConfig::default()).await?;
//!
//!     println!("{} ({} bytes)", artifact.file_name, artifact.payload.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod capture;
pub mod error;
pub mod preview;
pub mod server;
pub mod session;
pub mod snapshot;

// Re-exports for convenience
pub use capture::{perform_capture, CaptureArtifact, CaptureKind, CaptureRequest};
pub use error::{Error, Result};
pub use preview::{MetadataPreviewer, PagePreview};
pub use session::{CaptureSession, SessionConfig};
pub use snapshot::SnapshotRewriter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

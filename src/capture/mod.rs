//! Capture module
//!
//! Artifact types, content extraction, and the pipeline that chains a
//! session from acquire to release.

pub mod artifact;
pub mod extractor;
pub mod pipeline;

pub use artifact::{CaptureArtifact, CaptureKind};
pub use extractor::ContentExtractor;
pub use pipeline::{perform_capture, CaptureRequest};

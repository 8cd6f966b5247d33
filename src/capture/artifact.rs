//! Capture kinds and artifacts

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The artifact representation a capture produces.
///
/// The wire vocabulary is `html`/`screenshot`/`pdf`; internally the
/// kinds are the document, raster, and paginated representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CaptureKind {
    /// Sanitized self-contained HTML snapshot
    #[default]
    #[serde(rename = "html")]
    Document,
    /// Full-page PNG of the rendered state
    #[serde(rename = "screenshot")]
    Raster,
    /// Paginated print-styled PDF
    #[serde(rename = "pdf")]
    Paginated,
}

impl CaptureKind {
    /// The exact media type of this kind's payload
    pub fn media_type(self) -> &'static str {
        match self {
            CaptureKind::Document => "text/html; charset=utf-8",
            CaptureKind::Raster => "image/png",
            CaptureKind::Paginated => "application/pdf",
        }
    }

    /// The fixed download file name for this kind
    pub fn file_name(self) -> &'static str {
        match self {
            CaptureKind::Document => "archive.html",
            CaptureKind::Raster => "archive.png",
            CaptureKind::Paginated => "archive.pdf",
        }
    }

    /// The wire name of this kind
    pub fn as_str(self) -> &'static str {
        match self {
            CaptureKind::Document => "html",
            CaptureKind::Raster => "screenshot",
            CaptureKind::Paginated => "pdf",
        }
    }
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(CaptureKind::Document),
            "screenshot" => Ok(CaptureKind::Raster),
            "pdf" => Ok(CaptureKind::Paginated),
            other => Err(format!(
                "unknown capture kind '{}' (expected html, screenshot, or pdf)",
                other
            )),
        }
    }
}

/// The returned payload of one capture
#[derive(Debug, Clone)]
pub struct CaptureArtifact {
    /// Artifact bytes
    pub payload: Vec<u8>,
    /// Media type matching the payload format exactly
    pub media_type: &'static str,
    /// Fixed per-kind file name
    pub file_name: &'static str,
    /// The snapshot markup, populated only for the document kind so a
    /// consumer can embed it directly
    pub raw_markup: Option<String>,
}

impl CaptureArtifact {
    /// Render the artifact as a base64 data URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, BASE64.encode(&self.payload))
    }
}

//! Capture orchestration
//!
//! One capture is one asynchronous chain: acquire a session, install
//! the request filter, navigate, extract, rewrite (document kind), and
//! release the session on every exit path. No retries at this layer;
//! one failed step is terminal for the capture.

use crate::capture::{CaptureArtifact, CaptureKind, ContentExtractor};
use crate::error::{Error, Result};
use crate::session::{policy, CaptureSession, Navigator, SessionConfig};
use crate::snapshot::SnapshotRewriter;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

/// A request to capture one URL as one artifact kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Absolute http/https address of the page to capture
    pub url: String,
    /// Requested artifact kind (wire name `type`)
    #[serde(rename = "type", default)]
    pub kind: CaptureKind,
}

impl CaptureRequest {
    /// Create a request for an already-absolute URL
    pub fn new<S: Into<String>>(url: S, kind: CaptureKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Build a request from user-entered text, defaulting a missing URI
    /// scheme to https (the entry-form behavior).
    pub fn from_user_input(raw: &str, kind: CaptureKind) -> Self {
        let trimmed = raw.trim();
        let has_scheme = Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://")
            .map(|re| re.is_match(trimmed))
            .unwrap_or(false);
        let url = if has_scheme {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };
        Self { url, kind }
    }

    /// Check that the URL parses as absolute http/https.
    ///
    /// Runs before any session exists, so a bad address never costs a
    /// browser launch.
    pub fn validate(&self) -> Result<Url> {
        let url =
            Url::parse(&self.url).map_err(|e| Error::InvalidUrl(format!("{}: {}", self.url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidUrl(format!(
                "unsupported scheme '{}': {}",
                other, self.url
            ))),
        }
    }
}

/// Run one full capture: session acquire through artifact production.
///
/// The session is released on success and on failure of any step.
#[instrument(skip(config), fields(url = %request.url, kind = %request.kind))]
pub async fn perform_capture(
    request: &CaptureRequest,
    config: &SessionConfig,
) -> Result<CaptureArtifact> {
    let url = request.validate()?;

    let session = CaptureSession::acquire(config).await?;
    let outcome = capture_with_session(&session, url.as_str(), request.kind).await;
    session.release().await;

    match &outcome {
        Ok(artifact) => info!(
            "Capture complete: {} ({} bytes)",
            artifact.file_name,
            artifact.payload.len()
        ),
        Err(e) => info!("Capture failed: {}", e),
    }

    outcome
}

async fn capture_with_session(
    session: &CaptureSession,
    url: &str,
    kind: CaptureKind,
) -> Result<CaptureArtifact> {
    policy::install(session.page()).await?;
    Navigator::navigate(session, url).await?;

    let mut artifact = ContentExtractor::extract(session, kind).await?;

    if kind == CaptureKind::Document {
        if let Some(raw) = artifact.raw_markup.take() {
            let snapshot = SnapshotRewriter::rewrite(&raw, url);
            artifact.payload = snapshot.clone().into_bytes();
            artifact.raw_markup = Some(snapshot);
        }
    }

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_input_defaults_to_https() {
        let req = CaptureRequest::from_user_input("example.com/article", CaptureKind::Document);
        assert_eq!(req.url, "https://example.com/article");
    }

    #[test]
    fn test_user_input_keeps_existing_scheme() {
        let req = CaptureRequest::from_user_input("http://example.com", CaptureKind::Document);
        assert_eq!(req.url, "http://example.com");
    }

    #[test]
    fn test_user_input_trims_whitespace() {
        let req = CaptureRequest::from_user_input("  example.com  ", CaptureKind::Raster);
        assert_eq!(req.url, "https://example.com");
    }

    #[test]
    fn test_validate_accepts_http_and_https() {
        assert!(CaptureRequest::new("https://example.com", CaptureKind::Document)
            .validate()
            .is_ok());
        assert!(CaptureRequest::new("http://example.com", CaptureKind::Document)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        for url in ["ftp://example.com", "file:///etc/passwd", "javascript:alert(1)"] {
            let err = CaptureRequest::new(url, CaptureKind::Document)
                .validate()
                .unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "{}", url);
        }
    }

    #[test]
    fn test_validate_rejects_relative() {
        let err = CaptureRequest::new("example.com/page", CaptureKind::Document)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_request_deserializes_wire_form() {
        let req: CaptureRequest =
            serde_json::from_str(r#"{"url":"https://example.com","type":"screenshot"}"#).unwrap();
        assert_eq!(req.kind, CaptureKind::Raster);
    }

    #[test]
    fn test_request_kind_defaults_to_html() {
        let req: CaptureRequest = serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();
        assert_eq!(req.kind, CaptureKind::Document);
    }
}

//! Artifact extraction from a loaded page
//!
//! Produces the requested representation of the rendered document:
//! serialized markup, a full-page PNG, or a paginated PDF.

use crate::capture::{CaptureArtifact, CaptureKind};
use crate::error::{ExtractionError, Result};
use crate::session::CaptureSession;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, PrintToPdfParams};
use chromiumoxide::page::ScreenshotParams;
use tracing::{debug, info, instrument};

/// Serializes the whole document. `outerHTML` starts at the root
/// element and drops the doctype node, which would push the snapshot
/// into quirks mode, so the doctype is serialized separately and
/// prepended.
const DOCUMENT_SERIALIZE_SCRIPT: &str = r#"
    (document.doctype
        ? new XMLSerializer().serializeToString(document.doctype) + "\n"
        : "") + document.documentElement.outerHTML
"#;

/// Produces capture artifacts from a session's loaded page
pub struct ContentExtractor;

impl ContentExtractor {
    /// Extract the artifact of the given kind.
    ///
    /// The document kind returns the raw rendered markup; the snapshot
    /// rewrite happens downstream.
    #[instrument(skip(session))]
    pub async fn extract(session: &CaptureSession, kind: CaptureKind) -> Result<CaptureArtifact> {
        match kind {
            CaptureKind::Document => Self::markup(session).await,
            CaptureKind::Raster => Self::screenshot(session).await,
            CaptureKind::Paginated => Self::pdf(session).await,
        }
    }

    /// Serialize the live, rendered document to markup text
    #[instrument(skip(session))]
    pub async fn markup(session: &CaptureSession) -> Result<CaptureArtifact> {
        info!("Serializing rendered document");

        let html: String = session
            .page()
            .evaluate(DOCUMENT_SERIALIZE_SCRIPT)
            .await
            .map_err(|e| ExtractionError::Markup(e.to_string()))?
            .into_value()
            .map_err(|e| ExtractionError::Markup(e.to_string()))?;

        debug!("Markup serialized: {} bytes", html.len());

        Ok(CaptureArtifact {
            payload: html.clone().into_bytes(),
            media_type: CaptureKind::Document.media_type(),
            file_name: CaptureKind::Document.file_name(),
            raw_markup: Some(html),
        })
    }

    /// Capture a full-page PNG of the final rendered state
    #[instrument(skip(session))]
    pub async fn screenshot(session: &CaptureSession) -> Result<CaptureArtifact> {
        info!("Capturing full-page screenshot");

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .from_surface(true)
            .capture_beyond_viewport(true)
            .build();

        let data = session
            .page()
            .screenshot(params)
            .await
            .map_err(|e| ExtractionError::Screenshot(e.to_string()))?;

        debug!("Screenshot captured: {} bytes", data.len());

        Ok(CaptureArtifact {
            payload: data,
            media_type: CaptureKind::Raster.media_type(),
            file_name: CaptureKind::Raster.file_name(),
            raw_markup: None,
        })
    }

    /// Render a paginated, print-styled PDF honoring page-level style
    /// rules
    #[instrument(skip(session))]
    pub async fn pdf(session: &CaptureSession) -> Result<CaptureArtifact> {
        info!("Generating PDF");

        let params = PrintToPdfParams::builder()
            .print_background(true)
            .prefer_css_page_size(true)
            .build();

        let data = session
            .page()
            .pdf(params)
            .await
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        debug!("PDF generated: {} bytes", data.len());

        Ok(CaptureArtifact {
            payload: data,
            media_type: CaptureKind::Paginated.media_type(),
            file_name: CaptureKind::Paginated.file_name(),
            raw_markup: None,
        })
    }
}

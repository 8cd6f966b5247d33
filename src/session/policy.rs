//! Sub-resource request policy
//!
//! Every request a loading page issues is classified by resource
//! category and answered with exactly one allow/block decision. The
//! decision table is a pure total function; the CDP plumbing that
//! enforces it lives in [`install`].

use crate::error::Result;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

/// Classification of a sub-resource request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    /// Top-level or frame document
    Document,
    /// CSS stylesheet
    Stylesheet,
    /// Image
    Image,
    /// Audio/video media
    Media,
    /// Web font
    Font,
    /// Script
    Script,
    /// XMLHttpRequest
    Xhr,
    /// fetch() request
    Fetch,
    /// WebSocket handshake
    WebSocket,
    /// Server-sent events stream
    EventSource,
    /// Web app manifest
    Manifest,
    /// Anything else, including categories introduced by future
    /// protocol versions
    Other,
}

/// Allow/block verdict for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyDecision {
    /// Let the request proceed
    Allow,
    /// Abort the request
    Block,
}

impl From<ResourceType> for ResourceCategory {
    fn from(rt: ResourceType) -> Self {
        match rt {
            ResourceType::Document => ResourceCategory::Document,
            ResourceType::Stylesheet => ResourceCategory::Stylesheet,
            ResourceType::Image => ResourceCategory::Image,
            ResourceType::Media => ResourceCategory::Media,
            ResourceType::Font => ResourceCategory::Font,
            ResourceType::Script => ResourceCategory::Script,
            ResourceType::Xhr => ResourceCategory::Xhr,
            ResourceType::Fetch => ResourceCategory::Fetch,
            ResourceType::WebSocket => ResourceCategory::WebSocket,
            ResourceType::EventSource => ResourceCategory::EventSource,
            ResourceType::Manifest => ResourceCategory::Manifest,
            _ => ResourceCategory::Other,
        }
    }
}

/// Decide whether a request of the given category may proceed.
///
/// Scripts are blocked to keep origin code from ever executing (the
/// session-wide script disable is the other layer); media, fonts and
/// the dynamic-request categories are blocked to bound navigation
/// latency and network cost. Stylesheets and images stay so the
/// snapshot keeps its visual fidelity. Categories outside the block
/// set, including unrecognized ones, default to allow.
pub fn decision(category: ResourceCategory) -> PolicyDecision {
    match category {
        ResourceCategory::Media
        | ResourceCategory::Font
        | ResourceCategory::Script
        | ResourceCategory::Xhr
        | ResourceCategory::Fetch
        | ResourceCategory::WebSocket
        | ResourceCategory::EventSource
        | ResourceCategory::Manifest => PolicyDecision::Block,
        _ => PolicyDecision::Allow,
    }
}

/// Enable request interception on the page and answer every paused
/// request according to [`decision`].
///
/// The responder task lives as long as the page's event stream; it
/// ends when the session's browser process goes away.
#[instrument(skip(page))]
pub async fn install(page: &Page) -> Result<()> {
    page.execute(EnableParams::builder().build()).await?;

    let mut events = page.event_listener::<EventRequestPaused>().await?;
    let page = page.clone();

    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let category = ResourceCategory::from(event.resource_type.clone());
            let verdict = decision(category);
            trace!(?category, ?verdict, url = %event.request.url, "Request classified");

            // The request may already be gone (page torn down, redirect
            // raced the verdict); delivery failures are not worth
            // surfacing.
            match verdict {
                PolicyDecision::Allow => {
                    match ContinueRequestParams::builder()
                        .request_id(event.request_id.clone())
                        .build()
                    {
                        Ok(params) => {
                            if let Err(e) = page.execute(params).await {
                                debug!("Continue verdict not delivered: {}", e);
                            }
                        }
                        Err(e) => warn!("Failed to build continue verdict: {}", e),
                    }
                }
                PolicyDecision::Block => {
                    match FailRequestParams::builder()
                        .request_id(event.request_id.clone())
                        .error_reason(ErrorReason::BlockedByClient)
                        .build()
                    {
                        Ok(params) => {
                            if let Err(e) = page.execute(params).await {
                                debug!("Block verdict not delivered: {}", e);
                            }
                        }
                        Err(e) => warn!("Failed to build block verdict: {}", e),
                    }
                }
            }
        }
        debug!("Request filter stream ended");
    });

    Ok(())
}

//! Bounded page navigation
//!
//! Drives a session's page to the target URL under a fixed deadline.
//! Navigation waits for DOM parse completion, not network idle: the
//! policy filter blocks most dynamic traffic anyway, and waiting for
//! idle on script-heavy origins would burn the whole deadline. One
//! navigation per session, no retries.

use crate::error::{NavigationError, Result};
use crate::session::CaptureSession;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default navigation deadline in milliseconds; `SessionConfig`
/// derives its timeout default from this
pub const NAVIGATION_TIMEOUT_MS: u64 = 30000;

/// Fixed delay after DOM parse completion, a heuristic accommodation
/// for late layout
pub const SETTLE_DELAY_MS: u64 = 1000;

const DOM_READY_SCRIPT: &str = r#"
    new Promise(resolve => {
        if (document.readyState !== 'loading') {
            resolve(true);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(true));
        }
    })
"#;

/// Page navigator
pub struct Navigator;

impl Navigator {
    /// Navigate the session's page to `url` under the default deadline,
    /// wait for the DOM to finish parsing, then apply the settle delay.
    #[instrument(skip(session))]
    pub async fn navigate(session: &CaptureSession, url: &str) -> Result<()> {
        let timeout_ms = session.config().timeout_ms.max(1);
        let deadline = Duration::from_millis(timeout_ms);
        let page = session.page();

        info!("Navigating to: {}", url);

        tokio::time::timeout(deadline, page.goto(url))
            .await
            .map_err(|_| NavigationError::Timeout(timeout_ms))?
            .map_err(|e| classify(e.to_string()))?;

        tokio::time::timeout(deadline, page.evaluate(DOM_READY_SCRIPT))
            .await
            .map_err(|_| NavigationError::Timeout(timeout_ms))?
            .map_err(|e| classify(e.to_string()))?;

        debug!("DOM parsed, settling for {}ms", SETTLE_DELAY_MS);
        tokio::time::sleep(Duration::from_millis(SETTLE_DELAY_MS)).await;

        Ok(())
    }
}

/// Sort a CDP navigation failure into the network/other buckets.
fn classify(message: String) -> NavigationError {
    if message.contains("net::") || message.contains("ERR_") {
        NavigationError::Network(message)
    } else {
        NavigationError::Other(message)
    }
}

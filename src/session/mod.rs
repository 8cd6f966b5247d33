//! Browser session module
//!
//! Session lifecycle, sub-resource request policy, and bounded
//! navigation for a single capture.

pub mod manager;
pub mod navigation;
pub mod policy;

pub use manager::{CaptureSession, SessionConfig, BROWSER_USER_AGENT};
pub use navigation::{Navigator, NAVIGATION_TIMEOUT_MS, SETTLE_DELAY_MS};
pub use policy::{decision, PolicyDecision, ResourceCategory};

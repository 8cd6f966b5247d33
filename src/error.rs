//! Error types for byepass
//!
//! This module provides the error type hierarchy using `thiserror`.
//! One capture attempt surfaces at most one terminal error; snapshot
//! rewrite failures never reach this taxonomy (the rewriter degrades to
//! returning the unmodified markup instead).

use thiserror::Error;

/// The main error type for capture operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser session launch errors
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Artifact extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The requested URL is not an absolute http/https address
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Browser session lifecycle errors
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The browser executable is missing or could not be started
    #[error("Failed to launch browser: {0}")]
    Spawn(String),

    /// Invalid launch configuration
    #[error("Invalid browser configuration: {0}")]
    Config(String),

    /// The browser started but no page context could be created
    #[error("Failed to create page: {0}")]
    PageCreation(String),
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Navigation deadline exceeded
    #[error("Navigation timed out after {0}ms")]
    Timeout(u64),

    /// Network-level failure reaching the target
    #[error("Network error: {0}")]
    Network(String),

    /// Any other navigation failure
    #[error("Navigation failed: {0}")]
    Other(String),
}

/// Artifact extraction errors
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Screenshot capture failed
    #[error("Screenshot capture failed: {0}")]
    Screenshot(String),

    /// PDF generation failed
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// Markup serialization failed
    #[error("Markup serialization failed: {0}")]
    Markup(String),
}

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_error_display() {
        let err = Error::Launch(LaunchError::Spawn("no chromium".to_string()));
        assert!(err.to_string().contains("Failed to launch browser"));
        assert!(err.to_string().contains("no chromium"));
    }

    #[test]
    fn test_navigation_timeout_display() {
        let err = NavigationError::Timeout(30000);
        assert_eq!(err.to_string(), "Navigation timed out after 30000ms");
    }

    #[test]
    fn test_navigation_network_display() {
        let err = NavigationError::Network("net::ERR_NAME_NOT_RESOLVED".to_string());
        assert!(err.to_string().contains("Network error"));
    }

    #[test]
    fn test_extraction_error_display() {
        let err = Error::Extraction(ExtractionError::Pdf("out of memory".to_string()));
        assert!(err.to_string().contains("PDF generation failed"));
    }

    #[test]
    fn test_cdp_error_display() {
        let err = Error::Cdp("session closed".to_string());
        assert!(err.to_string().contains("CDP error"));
    }

    #[test]
    fn test_invalid_url_display() {
        let err = Error::InvalidUrl("ftp://example.com".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }
}

//! Capture session lifecycle
//!
//! One [`CaptureSession`] owns one headless browser process and one page
//! context for the duration of a single capture. Acquire starts both,
//! release terminates both; the pipeline calls release on every exit path.

use crate::error::{LaunchError, Result};
use crate::session::navigation::NAVIGATION_TIMEOUT_MS;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetScriptExecutionDisabledParams;
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Desktop Linux Chrome user agent used for page navigation
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Environment variable overriding the browser executable path
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

/// Well-known system locations probed for a Chromium executable
const SYSTEM_CHROME_PATHS: &[&str] = &["/usr/bin/chromium", "/usr/bin/chromium-browser"];

/// Configuration for a capture session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width (default: 1366)
    pub width: u32,
    /// Browser window height (default: 900)
    pub height: u32,
    /// Enable the Chromium sandbox (default: false, container-friendly)
    pub sandbox: bool,
    /// User agent string (None = [`BROWSER_USER_AGENT`])
    pub user_agent: Option<String>,
    /// Page operation deadline in milliseconds
    /// (default: [`NAVIGATION_TIMEOUT_MS`])
    pub timeout_ms: u64,
    /// Path to a Chromium executable (None = env/system/auto-detect)
    pub chrome_path: Option<String>,
    /// Additional Chromium arguments
    pub extra_args: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1366,
            height: 900,
            sandbox: false,
            user_agent: None,
            timeout_ms: NAVIGATION_TIMEOUT_MS,
            chrome_path: None,
            extra_args: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Create a new config builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Resolve the browser executable: explicit config path, then the
    /// `CHROME_PATH` environment variable, then well-known system
    /// locations. None lets the automation library auto-detect.
    pub fn resolve_chrome_path(&self) -> Option<String> {
        if let Some(ref path) = self.chrome_path {
            return Some(path.clone());
        }
        if let Ok(path) = std::env::var(CHROME_PATH_ENV) {
            if !path.is_empty() {
                return Some(path);
            }
        }
        SYSTEM_CHROME_PATHS
            .iter()
            .find(|p| Path::new(p).exists())
            .map(|p| p.to_string())
    }
}

/// Builder for SessionConfig
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set viewport dimensions
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Enable/disable the Chromium sandbox
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.config.user_agent = Some(ua.into());
        self
    }

    /// Set default page operation timeout
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set the browser executable path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Add an extra Chromium argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    /// Build the config
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

/// Exclusive handle to one browser process and one page context
pub struct CaptureSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    config: SessionConfig,
}

impl CaptureSession {
    /// Start one isolated browser process and one page context.
    ///
    /// The page comes up with script execution disabled, the archiver
    /// user agent and accept headers applied, and webdriver hints
    /// cloaked. Fails with [`LaunchError`] when the executable is
    /// missing or unstartable.
    #[instrument(skip(config))]
    pub async fn acquire(config: &SessionConfig) -> Result<Self> {
        info!("Launching browser session (headless={})", config.headless);

        let mut builder = CdpBrowserConfig::builder();

        builder = builder.viewport(chromiumoxide::handler::viewport::Viewport {
            width: config.width,
            height: config.height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        });

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.arg("--no-sandbox").arg("--disable-setuid-sandbox");
        }
        builder = builder.arg("--disable-dev-shm-usage").arg("--disable-gpu");

        if let Some(path) = config.resolve_chrome_path() {
            debug!("Using browser executable: {}", path);
            builder = builder.chrome_executable(path);
        }

        for arg in &config.extra_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| LaunchError::Config(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| LaunchError::Spawn(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    warn!("Browser handler event error");
                    break;
                }
            }
            debug!("Browser handler finished");
        });

        let page = match Self::prepare_page(&browser, config).await {
            Ok(page) => page,
            Err(e) => {
                // The process is already up; tear it down before failing.
                let mut browser = browser;
                if let Err(close_err) = browser.close().await {
                    warn!("Failed to close browser after setup error: {}", close_err);
                }
                handler_task.abort();
                return Err(e);
            }
        };

        info!("Browser session acquired");

        Ok(Self {
            browser,
            handler: handler_task,
            page,
            config: config.clone(),
        })
    }

    async fn prepare_page(browser: &Browser, config: &SessionConfig) -> Result<Page> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| LaunchError::PageCreation(e.to_string()))?;

        let ua = config
            .user_agent
            .clone()
            .unwrap_or_else(|| BROWSER_USER_AGENT.to_string());
        page.set_user_agent(ua.as_str())
            .await
            .map_err(|e| LaunchError::PageCreation(e.to_string()))?;

        let headers = SetExtraHttpHeadersParams::builder()
            .headers(Headers::new(serde_json::json!({
                "accept": "text/html,*/*",
                "accept-language": "en-US,en;q=0.9",
            })))
            .build()
            .map_err(LaunchError::Config)?;
        page.execute(headers)
            .await
            .map_err(|e| LaunchError::PageCreation(e.to_string()))?;

        // The target page's own scripts never run; the network policy
        // filter blocking the script category is the second layer.
        let no_scripts = SetScriptExecutionDisabledParams::builder()
            .value(true)
            .build()
            .map_err(LaunchError::Config)?;
        page.execute(no_scripts)
            .await
            .map_err(|e| LaunchError::PageCreation(e.to_string()))?;

        Self::cloak(&page).await?;

        Ok(page)
    }

    /// Mask the most common headless/automation hints before any
    /// document loads.
    async fn cloak(page: &Page) -> Result<()> {
        let script = r#"
            Object.defineProperty(navigator, 'webdriver', {
                get: () => undefined,
                configurable: true
            });
            Object.defineProperty(navigator, 'languages', {
                get: () => ['en-US', 'en'],
                configurable: true
            });
            Object.defineProperty(navigator, 'platform', {
                get: () => 'MacIntel',
                configurable: true
            });
        "#;

        let params = AddScriptToEvaluateOnNewDocumentParams::builder()
            .source(script)
            .build()
            .map_err(|e| LaunchError::PageCreation(e.to_string()))?;

        page.execute(params)
            .await
            .map_err(|e| LaunchError::PageCreation(e.to_string()))?;

        Ok(())
    }

    /// Get the session's page context
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Get the session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Terminate the browser process.
    ///
    /// Consumes the session, so exactly one release per acquire.
    /// Shutdown failures are logged, never propagated: by the time
    /// release runs the capture outcome is already decided.
    #[instrument(skip(self))]
    pub async fn release(mut self) {
        info!("Releasing browser session");

        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }

        if tokio::time::timeout(Duration::from_secs(5), self.handler)
            .await
            .is_err()
        {
            warn!("Browser handler did not finish within 5s");
        }

        info!("Browser session released");
    }
}

//! Page renderer trait and implementations.
//!
//! - `ChromeRenderer` loads the page in headless Chrome and returns the
//!   fully-rendered DOM. The whole browser session lives inside one blocking
//!   task; dropping the browser handle on any exit path closes it.
//! - `FixtureRenderer` returns canned HTML (or a canned failure) for tests.

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use tracing::debug;

use lectern_core::error::LecternError;

/// Renders a URL to its script-populated HTML.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load `url` in a browser context scoped to this call and return the
    /// rendered document.
    async fn render(&self, url: &str) -> Result<String, LecternError>;
}

// ---------------------------------------------------------------------------
// ChromeRenderer - headless Chrome per request
// ---------------------------------------------------------------------------

/// Headless-Chrome-backed renderer. One browser process per render call.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer;

impl ChromeRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Launch, navigate, wait for the load to settle, and grab the DOM.
    ///
    /// Runs synchronously; the browser (and its tab) is torn down when the
    /// handle drops, including on the error paths.
    fn render_sync(url: &str) -> Result<String, LecternError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|e| LecternError::Render(format!("invalid launch options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| LecternError::Render(format!("browser launch failed: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| LecternError::Render(format!("failed to open tab: {}", e)))?;

        tab.navigate_to(url)
            .map_err(|e| LecternError::Render(format!("navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| LecternError::Render(format!("page load failed: {}", e)))?;

        let content = tab
            .get_content()
            .map_err(|e| LecternError::Render(format!("failed to read DOM: {}", e)))?;

        Ok(content)
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<String, LecternError> {
        // Browser automation is blocking native work; keep it off the runtime.
        let url_owned = url.to_string();
        let content = tokio::task::spawn_blocking(move || Self::render_sync(&url_owned))
            .await
            .map_err(|e| LecternError::Render(format!("render task panicked: {}", e)))??;

        debug!(url, bytes = content.len(), "Page rendered");
        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// FixtureRenderer - canned HTML for testing
// ---------------------------------------------------------------------------

/// Renderer returning fixed HTML regardless of URL, or a fixed failure.
#[derive(Debug, Clone, Default)]
pub struct FixtureRenderer {
    html: String,
    error: Option<String>,
}

impl FixtureRenderer {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            error: None,
        }
    }

    /// A renderer that always fails, simulating a browser/network fault.
    pub fn failing(message: &str) -> Self {
        Self {
            html: String::new(),
            error: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl PageRenderer for FixtureRenderer {
    async fn render(&self, _url: &str) -> Result<String, LecternError> {
        match &self.error {
            Some(msg) => Err(LecternError::Render(msg.clone())),
            None => Ok(self.html.clone()),
        }
    }
}

//! Chromium-backed page driver using chromiumoxide.

use super::{DriverError, PageDriver};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. FORMFILL_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("FORMFILL_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.formfill/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".formfill/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".formfill/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".formfill/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".formfill/chromium/chrome-linux64/chrome"),
                home.join(".formfill/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A launched headless Chromium that hands out fillable pages.
pub struct ChromiumHost {
    browser: Browser,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumHost {
    /// Launch a headless Chromium instance.
    pub async fn launch() -> Result<Self> {
        let chrome_path =
            find_chromium().context("Chromium not found. Run `formfill doctor` for hints.")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Drain CDP events for the lifetime of the browser.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Open a fresh page (tab) for one fill pass.
    pub async fn new_page(&self) -> Result<ChromiumPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;
        self.active_count.fetch_add(1, Ordering::Relaxed);
        Ok(ChromiumPage {
            page,
            active_count: Arc::clone(&self.active_count),
        })
    }

    /// Number of currently open pages.
    pub fn active_pages(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page implementing [`PageDriver`].
pub struct ChromiumPage {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<(), DriverError> {
        let result = tokio::time::timeout(
            std::time::Duration::from_millis(timeout_ms),
            self.page.goto(url),
        )
        .await;

        match result {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => Err(DriverError::Navigation(e.to_string())),
            Err(_) => Err(DriverError::NavigationTimeout(timeout_ms)),
        }
    }

    async fn eval(&self, script: &str) -> Result<serde_json::Value, DriverError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Eval(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| DriverError::Eval(format!("result conversion failed: {e:?}")))
    }

    async fn url(&self) -> Result<String, DriverError> {
        Ok(self
            .page
            .url()
            .await
            .map_err(|e| DriverError::Eval(e.to_string()))?
            .map(|u| u.to_string())
            .unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::script;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_scan_probe_on_live_page() {
        let host = ChromiumHost::launch().await.expect("failed to launch");
        let mut page = Box::new(host.new_page().await.expect("failed to open page"));

        page.navigate(
            "data:text/html,<form><label>Email<input name='email' type='email'></label>\
             <select name='country'><option>India</option></select></form>",
            10_000,
        )
        .await
        .expect("navigation failed");

        let result = page
            .eval(&script::scan_controls(None))
            .await
            .expect("scan probe failed");
        let controls = result.as_array().expect("probe should return an array");
        assert!(controls.len() >= 2);

        page.close().await.expect("close failed");
        assert_eq!(host.active_pages(), 0);
    }
}

//! `formfill fill` — run one fill pass against a URL.

use crate::cli::output;
use crate::driver::chromium::ChromiumHost;
use crate::driver::PageDriver;
use crate::engine::FillEngine;
use crate::store::ProfileStore;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub async fn run(url: &str, profile_name: Option<&str>, timeout_ms: u64) -> Result<()> {
    let store = ProfileStore::default_store()?;
    let profile = match profile_name {
        Some(name) => store.load(name)?,
        None => store.load_selected()?,
    };

    let spinner = make_spinner();
    spinner.set_message("launching browser");
    let host = ChromiumHost::launch().await?;

    spinner.set_message(format!("navigating to {url}"));
    let mut page: Box<dyn PageDriver> = Box::new(host.new_page().await?);
    page.navigate(url, timeout_ms).await?;

    spinner.set_message("filling form");
    let result = FillEngine::new(page.as_ref()).run(&profile).await;
    let _ = page.close().await;
    spinner.finish_and_clear();

    let report = result?;
    if output::is_json() {
        output::print_json(&serde_json::to_value(&report)?);
        return Ok(());
    }

    output::say(&format!("{} on {}", report.summary(), report.url));
    for outcome in &report.outcomes {
        let mark = if outcome.filled { "[OK]" } else { "[--]" };
        match &outcome.detail {
            Some(detail) => output::say(&format!("  {mark} {} ({detail})", outcome.field)),
            None => output::say(&format!("  {mark} {}", outcome.field)),
        }
    }
    Ok(())
}

fn make_spinner() -> ProgressBar {
    if output::is_quiet() || output::is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

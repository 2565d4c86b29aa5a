//! Dropdown orchestration for custom and ARIA combobox widgets.
//!
//! Drives the open → search → score → pick sequence as a small state
//! machine with bounded waits. Every wait is a poll loop with a hard
//! deadline; a menu that never appears degrades into the fallback chain
//! (nested native control, then direct value assignment) instead of a hang.

use crate::driver::{is_ok, DriverError, PageDriver};
use crate::driver::script;
use crate::engine::classify::{Candidate, ControlKind, ControlMeta};
use crate::engine::scorer::{pick_best, MenuOption};
use crate::engine::setter;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

/// All timing bounds of the fill engine, in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Ceiling on waiting for a menu to appear after a trigger click.
    pub menu_open_ms: u64,
    /// Poll interval while waiting for a menu.
    pub poll_ms: u64,
    /// Settle delay after typing into a menu search input.
    pub settle_ms: u64,
    /// Delay before the single option-list retry.
    pub retry_ms: u64,
    /// Settle delay after clicking an add-entry affordance.
    pub add_entry_ms: u64,
    /// Pacing gap between consecutive field fills.
    pub field_gap_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            menu_open_ms: 600,
            poll_ms: 50,
            settle_ms: 120,
            retry_ms: 120,
            add_entry_ms: 500,
            field_gap_ms: 200,
        }
    }
}

/// One visible menu surface, as reported by the menu-scope probe.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuScope {
    #[serde(rename = "ref")]
    ref_id: u32,
    #[serde(default)]
    has_search_input: bool,
}

/// Orchestrates one dropdown fill against a single page.
pub struct DropdownOrchestrator<'a> {
    driver: &'a dyn PageDriver,
    timings: Timings,
}

impl<'a> DropdownOrchestrator<'a> {
    pub fn new(driver: &'a dyn PageDriver, timings: Timings) -> Self {
        Self { driver, timings }
    }

    /// Fill a custom/ARIA dropdown with the best-scoring option for `target`.
    ///
    /// Sequence: open the trigger (click, then keyboard fallback), optionally
    /// type-ahead into the menu's search input, score the visible options,
    /// click the winner. One bounded retry of the option listing, then the
    /// fallback chain: a nested native control inside the trigger's subtree,
    /// and finally a direct value assignment on the trigger itself.
    pub async fn fill(&self, candidate: &Candidate, target: &str) -> Result<bool, DriverError> {
        if let Some(menu) = self.open_menu(candidate.meta.ref_id).await? {
            if menu.has_search_input {
                let typed = self
                    .driver
                    .eval(&script::type_menu_search(menu.ref_id, target))
                    .await?;
                if is_ok(&typed) {
                    sleep(Duration::from_millis(self.timings.settle_ms)).await;
                }
            }
            if self.pick_from_menu(menu.ref_id, target).await? {
                return Ok(true);
            }
            // The menu may still be populating; one retry after a short wait.
            sleep(Duration::from_millis(self.timings.retry_ms)).await;
            if self.pick_from_menu(menu.ref_id, target).await? {
                return Ok(true);
            }
        }
        self.fallback_chain(candidate, target).await
    }

    /// Open the trigger and wait (bounded) for a visible menu scope.
    /// Click first; when nothing appears, retry with keyboard activation.
    async fn open_menu(&self, trigger_ref: u32) -> Result<Option<MenuScope>, DriverError> {
        let opened = self.driver.eval(&script::open_trigger(trigger_ref)).await?;
        if is_ok(&opened) {
            if let Some(menu) = self.wait_for_menu().await? {
                return Ok(Some(menu));
            }
        }
        let kbd = self.driver.eval(&script::keyboard_open(trigger_ref)).await?;
        if is_ok(&kbd) {
            return self.wait_for_menu().await;
        }
        Ok(None)
    }

    /// Poll for visible menu scopes until the open deadline passes.
    /// The last scope in document order wins (most recently mounted).
    async fn wait_for_menu(&self) -> Result<Option<MenuScope>, DriverError> {
        let deadline = self.timings.menu_open_ms / self.timings.poll_ms.max(1);
        for _ in 0..=deadline {
            let raw = self.driver.eval(&script::list_menu_scopes()).await?;
            let scopes: Vec<MenuScope> = serde_json::from_value(raw)
                .map_err(|e| DriverError::ProbeShape(format!("menu scope probe: {e}")))?;
            if let Some(scope) = scopes.into_iter().last() {
                return Ok(Some(scope));
            }
            sleep(Duration::from_millis(self.timings.poll_ms)).await;
        }
        Ok(None)
    }

    /// List the menu's options, score them, click the best.
    async fn pick_from_menu(&self, menu_ref: u32, target: &str) -> Result<bool, DriverError> {
        let raw = self.driver.eval(&script::list_menu_options(menu_ref)).await?;
        let options: Vec<MenuOption> = serde_json::from_value(raw)
            .map_err(|e| DriverError::ProbeShape(format!("menu option probe: {e}")))?;
        let Some(best) = pick_best(&options, target) else {
            return Ok(false);
        };
        let clicked = self
            .driver
            .eval(&script::click_and_notify(best.ref_id))
            .await?;
        Ok(is_ok(&clicked))
    }

    /// When no menu ever materialised: look for a usable native control
    /// nested inside the trigger, and as a last resort assign the value
    /// directly to anything exposing a `value` property.
    async fn fallback_chain(&self, candidate: &Candidate, target: &str) -> Result<bool, DriverError> {
        let nested = self
            .driver
            .eval(&script::find_nested_control(candidate.meta.ref_id))
            .await?;
        if !nested.is_null() {
            let meta: ControlMeta = serde_json::from_value(nested)
                .map_err(|e| DriverError::ProbeShape(format!("nested control probe: {e}")))?;
            let inner = Candidate::new(meta);
            match inner.kind {
                ControlKind::NativeSelect => {
                    if setter::set_native_select(self.driver, &inner, target).await? {
                        return Ok(true);
                    }
                }
                _ => {
                    let set = self
                        .driver
                        .eval(&script::set_value_prop(inner.meta.ref_id, target))
                        .await?;
                    if is_ok(&set) {
                        return Ok(true);
                    }
                }
            }
        }
        let set = self
            .driver
            .eval(&script::set_value_prop(candidate.meta.ref_id, target))
            .await?;
        Ok(is_ok(&set))
    }
}

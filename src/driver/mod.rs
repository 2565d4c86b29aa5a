//! Page driver abstraction for live-page interaction.
//!
//! Defines the [`PageDriver`] trait that abstracts over the browser engine
//! (currently Chromium via chromiumoxide). The fill engine only ever talks
//! to a page through this trait, so tests drive it with a scripted fake.

pub mod chromium;
pub mod script;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Driver-level failures. Everything above the driver maps these into
/// "not filled" outcomes or a pipeline-fatal error.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Navigation to the target page failed.
    #[error("navigation failed: {0}")]
    Navigation(String),
    /// Navigation did not complete within the bound.
    #[error("navigation timed out after {0}ms")]
    NavigationTimeout(u64),
    /// A probe or action script failed to evaluate.
    #[error("script evaluation failed: {0}")]
    Eval(String),
    /// A probe returned JSON the engine could not interpret.
    #[error("unexpected probe output: {0}")]
    ProbeShape(String),
}

/// A live page the engine can drive.
///
/// `eval` is the only DOM channel: probes return JSON, action scripts
/// return small `{ok: …}` objects. The engine never holds raw node
/// handles; elements are addressed by their stamped `data-ff-ref` marker.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL with a hard timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<(), DriverError>;
    /// Evaluate JavaScript in the page context and return its JSON value.
    async fn eval(&self, script: &str) -> Result<Value, DriverError>;
    /// Current page URL.
    async fn url(&self) -> Result<String, DriverError>;
    /// Close this page.
    async fn close(self: Box<Self>) -> Result<(), DriverError>;
}

/// Read the `ok` flag out of an action-script result object.
pub(crate) fn is_ok(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|o| o.get("ok"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Read the `changed` flag out of an action-script result object.
pub(crate) fn is_changed(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|o| o.get("changed"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

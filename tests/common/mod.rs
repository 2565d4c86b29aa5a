//! Shared test support: a scripted in-memory page driver.

use async_trait::async_trait;
use formfill::driver::{DriverError, PageDriver};
use serde_json::{json, Value};
use std::sync::Mutex;

/// One canned response rule: any evaluated script containing `needle`
/// gets the next value from `responses` (the last value repeats).
struct Rule {
    needle: String,
    responses: Vec<Value>,
    served: usize,
}

/// A fake page driver that answers probe/action scripts from canned rules
/// and records every script it was asked to evaluate.
pub struct ScriptedDriver {
    rules: Mutex<Vec<Rule>>,
    pub scripts: Mutex<Vec<String>>,
    url: String,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            scripts: Mutex::new(Vec::new()),
            url: "https://jobs.example.com/apply".to_string(),
        }
    }

    /// Answer every script containing `needle` with `response`.
    /// Rules are tried in registration order; first hit wins.
    pub fn on(self, needle: &str, response: Value) -> Self {
        self.rules.lock().unwrap().push(Rule {
            needle: needle.to_string(),
            responses: vec![response],
            served: 0,
        });
        self
    }

    /// Answer successive matching scripts with successive values; the last
    /// value repeats once the sequence is exhausted.
    pub fn on_seq(self, needle: &str, responses: Vec<Value>) -> Self {
        assert!(!responses.is_empty());
        self.rules.lock().unwrap().push(Rule {
            needle: needle.to_string(),
            responses,
            served: 0,
        });
        self
    }

    /// Number of evaluated scripts containing the needle.
    pub fn count_scripts_containing(&self, needle: &str) -> usize {
        self.scripts
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.contains(needle))
            .count()
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&mut self, _url: &str, _timeout_ms: u64) -> Result<(), DriverError> {
        Ok(())
    }

    async fn eval(&self, script: &str) -> Result<Value, DriverError> {
        self.scripts.lock().unwrap().push(script.to_string());
        let mut rules = self.rules.lock().unwrap();
        for rule in rules.iter_mut() {
            if script.contains(&rule.needle) {
                let idx = rule.served.min(rule.responses.len() - 1);
                rule.served += 1;
                return Ok(rule.responses[idx].clone());
            }
        }
        // Unscripted action scripts succeed quietly; unscripted probes
        // return an empty result set.
        if script.contains("return nodes.map") || script.contains(".filter(Boolean);") {
            return Ok(json!([]));
        }
        Ok(json!({ "ok": false }))
    }

    async fn url(&self) -> Result<String, DriverError> {
        Ok(self.url.clone())
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        Ok(())
    }
}

/// Control metadata as the scan probe reports it.
pub fn input_meta(ref_id: u32, input_type: &str, blob: &str) -> Value {
    json!({
        "ref": ref_id,
        "tag": "input",
        "inputType": input_type,
        "blob": blob,
    })
}

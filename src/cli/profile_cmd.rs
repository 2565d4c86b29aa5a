//! `formfill profile` — manage stored candidate profiles.

use crate::cli::output;
use crate::store::ProfileStore;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;

pub fn run_list() -> Result<()> {
    let store = ProfileStore::default_store()?;
    let profiles = store.list()?;
    let selected = store.selected();
    if output::is_json() {
        output::print_json(&json!({ "profiles": profiles, "selected": selected }));
        return Ok(());
    }
    if profiles.is_empty() {
        output::say("no profiles stored; run `formfill profile add <name> <file.json>`");
        return Ok(());
    }
    for name in profiles {
        if selected.as_deref() == Some(name.as_str()) {
            output::say(&format!("* {name}"));
        } else {
            output::say(&format!("  {name}"));
        }
    }
    Ok(())
}

pub fn run_add(name: &str, path: &Path) -> Result<()> {
    let store = ProfileStore::default_store()?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    store.save(name, &value)?;
    // First profile becomes the selection automatically.
    if store.selected().is_none() {
        store.select(name)?;
    }
    output::say(&format!("saved profile '{name}'"));
    Ok(())
}

pub fn run_select(name: &str) -> Result<()> {
    let store = ProfileStore::default_store()?;
    store.select(name)?;
    output::say(&format!("selected profile '{name}'"));
    Ok(())
}

pub fn run_remove(name: &str) -> Result<()> {
    let store = ProfileStore::default_store()?;
    store.delete(name)?;
    output::say(&format!("removed profile '{name}'"));
    Ok(())
}

pub fn run_show(name: Option<&str>) -> Result<()> {
    let store = ProfileStore::default_store()?;
    let profile = match name {
        Some(n) => store.load(n)?,
        None => store.load_selected()?,
    };
    output::print_json(&serde_json::to_value(&profile)?);
    Ok(())
}

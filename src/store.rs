//! Profile storage under `~/.formfill/`.
//!
//! Profiles are plain JSON files in `~/.formfill/profiles/`; the selected
//! profile name lives in `~/.formfill/state.json`. Both wire shapes are
//! accepted on save and normalised on load through
//! [`ProfileRecord::from_value`].

use crate::profile::ProfileRecord;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    selected_profile: Option<String>,
}

/// Filesystem-backed profile store.
pub struct ProfileStore {
    base_dir: PathBuf,
}

impl ProfileStore {
    /// Open (creating directories as needed) a store rooted at `base_dir`.
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(base_dir.join("profiles"))
            .with_context(|| format!("failed to create store dir: {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    /// The default store at `~/.formfill/`.
    pub fn default_store() -> Result<Self> {
        let base = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".formfill");
        Self::new(base)
    }

    fn profile_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("invalid profile name '{name}' (use letters, digits, '-', '_')");
        }
        Ok(self.base_dir.join("profiles").join(format!("{name}.json")))
    }

    fn state_path(&self) -> PathBuf {
        self.base_dir.join("state.json")
    }

    fn read_state(&self) -> StoreState {
        fs::read_to_string(self.state_path())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    fn write_state(&self, state: &StoreState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(self.state_path(), json)
            .with_context(|| format!("failed to write {}", self.state_path().display()))?;
        Ok(())
    }

    /// Save a raw profile document. The shape is validated by parsing it
    /// before anything touches disk.
    pub fn save(&self, name: &str, raw: &Value) -> Result<()> {
        ProfileRecord::from_value(raw).context("profile document did not parse")?;
        let path = self.profile_path(name)?;
        let json = serde_json::to_string_pretty(raw)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write profile: {}", path.display()))?;
        Ok(())
    }

    /// Load one profile by name.
    pub fn load(&self, name: &str) -> Result<ProfileRecord> {
        let path = self.profile_path(name)?;
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("profile '{name}' not found at {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("profile '{name}' is not valid JSON"))?;
        ProfileRecord::from_value(&value)
    }

    /// List stored profile names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.base_dir.join("profiles"))?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.profile_path(name)?;
        fs::remove_file(&path)
            .with_context(|| format!("profile '{name}' not found at {}", path.display()))?;
        let mut state = self.read_state();
        if state.selected_profile.as_deref() == Some(name) {
            state.selected_profile = None;
            self.write_state(&state)?;
        }
        Ok(())
    }

    /// Mark a profile as selected. The profile must exist.
    pub fn select(&self, name: &str) -> Result<()> {
        self.load(name)?;
        self.write_state(&StoreState {
            selected_profile: Some(name.to_string()),
        })
    }

    /// Currently selected profile name, if any.
    pub fn selected(&self) -> Option<String> {
        self.read_state().selected_profile
    }

    /// Load the selected profile.
    pub fn load_selected(&self) -> Result<ProfileRecord> {
        match self.selected() {
            Some(name) => self.load(&name),
            None => bail!("no profile selected; run `formfill profile select <name>`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProfileStore) {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (_dir, store) = store();
        store
            .save("default", &json!({"firstName": "Asha", "email": "a@b.com"}))
            .unwrap();
        let p = store.load("default").unwrap();
        assert_eq!(p.first_name.as_deref(), Some("Asha"));
        assert_eq!(store.list().unwrap(), vec!["default"]);
    }

    #[test]
    fn test_select_and_load_selected() {
        let (_dir, store) = store();
        store.save("work", &json!({"firstName": "Asha"})).unwrap();
        assert!(store.selected().is_none());
        store.select("work").unwrap();
        assert_eq!(store.selected().as_deref(), Some("work"));
        assert_eq!(
            store.load_selected().unwrap().first_name.as_deref(),
            Some("Asha")
        );
    }

    #[test]
    fn test_select_missing_profile_fails() {
        let (_dir, store) = store();
        assert!(store.select("ghost").is_err());
        assert!(store.load_selected().is_err());
    }

    #[test]
    fn test_delete_clears_selection() {
        let (_dir, store) = store();
        store.save("work", &json!({})).unwrap();
        store.select("work").unwrap();
        store.delete("work").unwrap();
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_rejects_path_traversal_names() {
        let (_dir, store) = store();
        assert!(store.save("../evil", &json!({})).is_err());
        assert!(store.load("a/b").is_err());
        assert!(store.profile_path("").is_err());
    }

    #[test]
    fn test_save_rejects_garbage_shapes() {
        let (_dir, store) = store();
        assert!(store.save("bad", &json!({"skills": {"not": "a list"}})).is_ok());
        // Arrays-of-objects in scalar slots do fail parsing.
        assert!(store
            .save("worse", &json!({"firstName": {"x": 1}}))
            .is_err());
    }
}

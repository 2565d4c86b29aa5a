//! `formfill serve` — run the localhost REST API.

use crate::cli::output;
use crate::rest::{self, SharedState};
use crate::store::ProfileStore;
use anyhow::Result;
use std::sync::Arc;

pub async fn run(port: u16) -> Result<()> {
    let store = ProfileStore::default_store()?;
    let state = Arc::new(SharedState::new(store));
    output::say(&format!("formfill REST API on http://127.0.0.1:{port}"));
    rest::start(port, state).await
}

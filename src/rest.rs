// Copyright 2026 Formfill Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for the fill engine.
//!
//! Exposes fill runs and profile management over localhost HTTP so browser
//! extensions and scripts can drive the engine without shelling out. Every
//! response carries an `ok` flag; failures come back as
//! `{ok: false, error: …}` with status 200 so thin clients never need to
//! branch on status codes.

use crate::driver::chromium::{find_chromium, ChromiumHost};
use crate::driver::PageDriver;
use crate::engine::FillEngine;
use crate::store::ProfileStore;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// Wrapper to assert a future is Send.
///
/// The fill future contains only Send types but the compiler cannot prove
/// it due to higher-ranked lifetime bounds in transitive dependencies
/// (chromiumoxide).
struct AssertSend<F>(F);

// SAFETY: all concrete types held across await points in the fill future
// are Send; only trait-object lifetime inference blocks the auto impl.
unsafe impl<F: std::future::Future> Send for AssertSend<F> {}

impl<F: std::future::Future> std::future::Future for AssertSend<F> {
    type Output = F::Output;
    fn poll(
        self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        let inner = unsafe { self.map_unchecked_mut(|s| &mut s.0) };
        inner.poll(cx)
    }
}

/// State shared by all REST handlers.
pub struct SharedState {
    pub store: ProfileStore,
    /// Lazily launched browser, shared across fill runs.
    host: Mutex<Option<ChromiumHost>>,
    started_at: Instant,
}

impl SharedState {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store,
            host: Mutex::new(None),
            started_at: Instant::now(),
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<SharedState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/fill", post(handle_fill))
        .route("/api/v1/profiles", get(handle_list_profiles))
        .route("/api/v1/profiles/:name", post(handle_save_profile))
        .route("/api/v1/profiles/:name", delete(handle_delete_profile))
        .route("/api/v1/profiles/:name/select", post(handle_select_profile))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given port (localhost only).
pub async fn start(port: u16, state: Arc<SharedState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn ok(mut extra: Value) -> Json<Value> {
    if let Some(obj) = extra.as_object_mut() {
        obj.insert("ok".to_string(), json!(true));
    }
    Json(extra)
}

fn err(message: impl std::fmt::Display) -> Json<Value> {
    Json(json!({ "ok": false, "error": message.to_string() }))
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn handle_status(State(state): State<Arc<SharedState>>) -> Json<Value> {
    let profiles = state.store.list().unwrap_or_default();
    let active_pages = {
        let host = state.host.lock().await;
        host.as_ref().map(|h| h.active_pages()).unwrap_or(0)
    };
    Json(json!({
        "running": true,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
        "chromium_available": find_chromium().is_some(),
        "active_pages": active_pages,
        "profiles": profiles,
        "selected_profile": state.store.selected(),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FillParams {
    url: String,
    /// Profile name; defaults to the selected profile.
    profile: Option<String>,
    /// Navigation timeout override.
    timeout_ms: Option<u64>,
}

async fn handle_fill(
    State(state): State<Arc<SharedState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let params: FillParams = match serde_json::from_value(body) {
        Ok(p) => p,
        Err(e) => return err(format!("invalid fill request: {e}")),
    };
    let fut = AssertSend(run_fill(state, params));
    let result = tokio::task::spawn(fut)
        .await
        .unwrap_or_else(|e| json!({ "ok": false, "error": format!("fill task panicked: {e}") }));
    Json(result)
}

/// One full fill run: load profile, ensure a browser, navigate, fill.
async fn run_fill(state: Arc<SharedState>, params: FillParams) -> Value {
    let run_id = Uuid::new_v4().to_string();
    tracing::info!(run_id = %run_id, url = %params.url, "fill run requested");

    let profile = match &params.profile {
        Some(name) => state.store.load(name),
        None => state.store.load_selected(),
    };
    let profile = match profile {
        Ok(p) => p,
        Err(e) => return json!({ "ok": false, "error": e.to_string() }),
    };

    {
        let mut host = state.host.lock().await;
        if host.is_none() {
            match ChromiumHost::launch().await {
                Ok(h) => *host = Some(h),
                Err(e) => return json!({ "ok": false, "error": e.to_string() }),
            }
        }
    }

    let page = {
        let host = state.host.lock().await;
        match host.as_ref() {
            Some(h) => h.new_page().await,
            None => return json!({ "ok": false, "error": "browser unavailable" }),
        }
    };
    let mut page: Box<dyn PageDriver> = match page {
        Ok(p) => Box::new(p),
        Err(e) => return json!({ "ok": false, "error": e.to_string() }),
    };

    let timeout = params.timeout_ms.unwrap_or(30_000);
    if let Err(e) = page.navigate(&params.url, timeout).await {
        let _ = page.close().await;
        return json!({ "ok": false, "error": e.to_string() });
    }

    let result = FillEngine::new(page.as_ref()).run(&profile).await;
    let _ = page.close().await;

    match result {
        Ok(report) => json!({
            "ok": true,
            "runId": run_id,
            "message": report.summary(),
            "report": report,
        }),
        Err(e) => json!({ "ok": false, "runId": run_id, "error": e.to_string() }),
    }
}

async fn handle_list_profiles(State(state): State<Arc<SharedState>>) -> Json<Value> {
    match state.store.list() {
        Ok(profiles) => ok(json!({
            "profiles": profiles,
            "selected": state.store.selected(),
        })),
        Err(e) => err(e),
    }
}

async fn handle_save_profile(
    State(state): State<Arc<SharedState>>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    match state.store.save(&name, &body) {
        Ok(()) => ok(json!({ "profile": name })),
        Err(e) => err(e),
    }
}

async fn handle_delete_profile(
    State(state): State<Arc<SharedState>>,
    Path(name): Path<String>,
) -> Json<Value> {
    match state.store.delete(&name) {
        Ok(()) => ok(json!({ "profile": name })),
        Err(e) => err(e),
    }
}

async fn handle_select_profile(
    State(state): State<Arc<SharedState>>,
    Path(name): Path<String>,
) -> Json<Value> {
    match state.store.select(&name) {
        Ok(()) => ok(json!({ "selected": name })),
        Err(e) => err(e),
    }
}

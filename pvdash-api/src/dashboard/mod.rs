//! HTTP presentation of the snapshot
//!
//! A single route, `GET /`, renders the page template against the snapshot
//! captured at startup. The router is built explicitly from its state so
//! tests can drive it without binding a socket.

pub mod template;

use crate::error::ApiError;
use axum::{extract::State, response::Html, routing::get, Router};
use pvdash_common::Snapshot;
use std::sync::Arc;
use template::TemplateSource;
use tower_http::trace::TraceLayer;

/// Read-only state shared by every request
#[derive(Debug)]
pub struct DashboardState {
    snapshot: Snapshot,
    templates: TemplateSource,
}

impl DashboardState {
    pub fn new(snapshot: Snapshot, templates: TemplateSource) -> Self {
        Self {
            snapshot,
            templates,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

/// Build the dashboard router
pub fn router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(index))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index(State(state): State<Arc<DashboardState>>) -> Result<Html<String>, ApiError> {
    let html = state.templates.render(state.snapshot()).await?;
    Ok(Html(html))
}

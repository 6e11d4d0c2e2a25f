//! HTTP-level tests for the dashboard router
//!
//! Run with: cargo test --test dashboard_tests

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use common::*;
use pvdash_api::aggregator::{Aggregator, AggregatorOptions};
use pvdash_api::config::PlacementPolicy;
use pvdash_api::dashboard::{router, template::TemplateSource, DashboardState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const PAGE: &str = r#"<ul>
{% for pv in pvs %}<li class="pv">{{ pv.name }} {{ pv.size }} {{ pv.status }}</li>
{% endfor %}
{% for pvc in pvcs %}<li class="pvc">{{ pvc.namespace }}/{{ pvc.name }} -> {{ pvc.boundVolume }}</li>
{% endfor %}
</ul>"#;

async fn app_with(templates: TemplateSource) -> Router {
    let cluster = scenario_cluster();
    let snapshot = Aggregator::new(AggregatorOptions {
        placement: PlacementPolicy::Disabled,
        pod_field_selector: None,
    })
    .collect(&cluster)
    .await
    .expect("aggregation should succeed");

    router(Arc::new(DashboardState::new(snapshot, templates)))
}

fn write_page(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("index.html");
    std::fs::write(&path, PAGE).expect("write template");
    path
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn test_index_lists_every_volume_and_claim() {
    let dir = TempDir::new().unwrap();
    let app = app_with(TemplateSource::reload(write_page(&dir))).await;

    let (status, body) = send(&app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("pv-a 10Gi Bound"));
    assert!(body.contains("pv-b 5Gi Available"));
    assert!(body.contains("ns1/claim-x -> pv-a"));
}

#[tokio::test]
async fn test_repeated_requests_render_identically() {
    let dir = TempDir::new().unwrap();
    let app = app_with(TemplateSource::reload(write_page(&dir))).await;

    let (_, first) = send(&app, Method::GET, "/").await;
    let (_, second) = send(&app, Method::GET, "/").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_template_is_500_until_restored() {
    let dir = TempDir::new().unwrap();
    let path = write_page(&dir);
    let app = app_with(TemplateSource::reload(&path)).await;

    std::fs::remove_file(&path).unwrap();
    let (status, body) = send(&app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Error loading template"));
    assert!(!body.contains("pv-a"));

    // The process keeps serving and recovers once the file is back
    write_page(&dir);
    let (status, body) = send(&app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("pv-a"));
}

#[tokio::test]
async fn test_broken_template_is_500() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html");
    std::fs::write(&path, "{% for pv in pvs %}unterminated").unwrap();
    let app = app_with(TemplateSource::reload(&path)).await;

    let (status, body) = send(&app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Error loading template"));
}

#[tokio::test]
async fn test_cached_template_survives_deletion() {
    let dir = TempDir::new().unwrap();
    let path = write_page(&dir);
    let templates = TemplateSource::cached(&path).await.unwrap();
    let app = app_with(templates).await;

    std::fs::remove_file(&path).unwrap();
    let (status, body) = send(&app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("pv-b"));
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app_with(TemplateSource::reload(write_page(&dir))).await;

    let (status, _) = send(&app, Method::GET, "/volumes").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_is_405() {
    let dir = TempDir::new().unwrap();
    let app = app_with(TemplateSource::reload(write_page(&dir))).await;

    let (status, _) = send(&app, Method::POST, "/").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_shipped_template_renders_snapshot() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/index.html");
    let app = app_with(TemplateSource::reload(path)).await;

    let (status, body) = send(&app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    for name in ["pv-a", "pv-b", "claim-x", "ns1", "10Gi", "5Gi", "uid-pv-a"] {
        assert!(body.contains(name), "rendered page is missing {}", name);
    }
    // Interpolated values are HTML-escaped, including the `/` in timestamps
    assert!(body.contains("2024-03-01&#x2f;12:00:00"));
    assert!(body.contains("app=db"));
}

#[tokio::test]
async fn test_state_exposes_startup_snapshot() {
    let snapshot = Aggregator::new(AggregatorOptions::default())
        .collect(&scenario_cluster())
        .await
        .unwrap();
    let state = DashboardState::new(snapshot.clone(), TemplateSource::reload("unused.html"));

    assert_eq!(state.snapshot(), &snapshot);
    assert_eq!(state.snapshot().volumes().len(), 2);
}

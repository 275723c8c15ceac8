// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! These tests verify that:
//! - Every page route answers GET (and POST where the form posts back)
//! - /health reports version and configured models
//! - Unknown routes are 404

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use liveness_web::{api::create_app, version::VERSION_NUMBER, CachePolicy};
use tower::util::ServiceExt; // for `oneshot`

use crate::common::{body_text, get_request, test_state, StubLoader, StubNetwork};

#[tokio::test]
async fn test_index_form_served() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(1, StubNetwork::Identity),
        CachePolicy::Shared,
    );

    let response = create_app(state).oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains(r#"name="algo-sel""#));
    assert!(html.contains(r#"enctype="multipart/form-data""#));
}

#[tokio::test]
async fn test_matching_page_get_and_post() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(1, StubNetwork::Identity),
        CachePolicy::Shared,
    );

    let get = create_app(state.clone())
        .oneshot(get_request("/matching"))
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::OK);
    let get_html = body_text(get).await;

    let post_request = Request::builder()
        .method(Method::POST)
        .uri("/matching")
        .body(Body::empty())
        .unwrap();
    let post = create_app(state).oneshot(post_request).await.unwrap();
    assert_eq!(post.status(), StatusCode::OK);
    assert_eq!(body_text(post).await, get_html);
}

#[tokio::test]
async fn test_reconstruction_form_served() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(1, StubNetwork::Identity),
        CachePolicy::Shared,
    );

    let response = create_app(state)
        .oneshot(get_request("/reconstruction"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"action="/reconstruction""#));
}

#[tokio::test]
async fn test_health_reports_models() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(1, StubNetwork::Identity),
        CachePolicy::Shared,
    );
    state.router.models().warm_up(&state.config.models).await;

    let response = create_app(state).oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], VERSION_NUMBER);

    let models = json["models"].as_array().unwrap();
    assert_eq!(models.len(), 3);
    assert_eq!(models[0]["name"], "svm");
    assert_eq!(models[0]["kind"], "classifier");
    assert!(models.iter().all(|m| m["loaded"] == true));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(1, StubNetwork::Identity),
        CachePolicy::Shared,
    );

    let response = create_app(state)
        .oneshot(get_request("/v1/models"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

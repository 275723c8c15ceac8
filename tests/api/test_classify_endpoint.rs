// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Classification endpoint tests (POST /)
//!
//! Models are stubbed through the `ModelLoader` trait, so these tests
//! exercise upload handling, routing and rendering without artifacts.

use axum::http::StatusCode;
use liveness_web::{api::create_app, AppState, CachePolicy, ModelRegistry};
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::common::{
    body_text, horizontal_ramp, multipart_request, test_config, test_state, Part, StubLoader,
    StubNetwork,
};

#[tokio::test]
async fn test_svm_class_zero_renders_fake() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );
    let image = horizontal_ramp();

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "face.png",
                data: &image,
            },
            Part::Text {
                name: "algo-sel",
                value: "svm",
            },
        ],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<strong>SVM</strong>"));
    assert!(html.contains("<strong>Fake</strong>"));
    assert!(html.contains("/get_image/face.png"));
    assert!(dir.path().join("face.png").is_file());
}

#[tokio::test]
async fn test_svm_class_one_renders_live() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(1, StubNetwork::Identity),
        CachePolicy::Shared,
    );
    let image = horizontal_ramp();

    let request = multipart_request(
        "/",
        &[
            Part::Text {
                name: "algo-sel",
                value: "svm",
            },
            Part::File {
                name: "file",
                filename: "face.png",
                data: &image,
            },
        ],
    );
    let html = body_text(create_app(state).oneshot(request).await.unwrap()).await;
    assert!(html.contains("<strong>Live</strong>"));
}

#[tokio::test]
async fn test_cnn_exact_one_is_live() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Fixed(vec![1, 1], 1.0)),
        CachePolicy::Shared,
    );
    let image = horizontal_ramp();

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "face.png",
                data: &image,
            },
            Part::Text {
                name: "algo-sel",
                value: "cnn",
            },
        ],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<strong>CNN</strong>"));
    assert!(html.contains("<strong>Live</strong>"));
}

#[tokio::test]
async fn test_cnn_other_values_are_fake() {
    for value in [0.0f32, 0.5, 0.999] {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(
            dir.path(),
            StubLoader::new(1, StubNetwork::Fixed(vec![1, 1], value)),
            CachePolicy::Shared,
        );
        let image = horizontal_ramp();

        let request = multipart_request(
            "/",
            &[
                Part::File {
                    name: "file",
                    filename: "face.png",
                    data: &image,
                },
                Part::Text {
                    name: "algo-sel",
                    value: "cnn",
                },
            ],
        );
        let html = body_text(create_app(state).oneshot(request).await.unwrap()).await;
        assert!(html.contains("<strong>Fake</strong>"), "value {}", value);
    }
}

#[tokio::test]
async fn test_unknown_selector_uses_cnn() {
    let dir = tempfile::tempdir().unwrap();
    let loader = StubLoader::new(0, StubNetwork::Fixed(vec![1, 1], 1.0));
    let state = test_state(dir.path(), loader.clone(), CachePolicy::Shared);
    let image = horizontal_ramp();

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "face.png",
                data: &image,
            },
            Part::Text {
                name: "algo-sel",
                value: "resnet",
            },
        ],
    );
    let html = body_text(create_app(state).oneshot(request).await.unwrap()).await;
    assert!(html.contains("<strong>CNN</strong>"));
    assert_eq!(loader.classifier_loads(), 0);
    assert_eq!(loader.network_loads(), 1);
}

#[tokio::test]
async fn test_traversal_filename_is_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let state = test_state(
        &uploads,
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );
    let image = horizontal_ramp();

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "../../etc/passwd.jpg",
                data: &image,
            },
            Part::Text {
                name: "algo-sel",
                value: "svm",
            },
        ],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("/get_image/etc_passwd.jpg"));
    assert!(uploads.join("etc_passwd.jpg").is_file());
    assert!(!dir.path().join("etc").exists());
}

#[tokio::test]
async fn test_missing_file_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );

    let request = multipart_request(
        "/",
        &[Part::Text {
            name: "algo-sel",
            value: "svm",
        }],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No file part in the request");
}

#[tokio::test]
async fn test_empty_file_selection_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "",
                data: b"",
            },
            Part::Text {
                name: "algo-sel",
                value: "svm",
            },
        ],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_selector_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );
    let image = horizontal_ramp();

    let request = multipart_request(
        "/",
        &[Part::File {
            name: "file",
            filename: "face.png",
            data: &image,
        }],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("algo-sel"));
    // Nothing is stored when the form is incomplete
    assert!(!dir.path().join("face.png").exists());
}

#[tokio::test]
async fn test_unusable_filename_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );
    let image = horizontal_ramp();

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "../..",
                data: &image,
            },
            Part::Text {
                name: "algo-sel",
                value: "svm",
            },
        ],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_model_is_generic_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), CachePolicy::Shared);
    config.models.svm = dir.path().join("absent/SVM_rbf.json");
    let registry = Arc::new(ModelRegistry::new(CachePolicy::Shared));
    let state = Arc::new(AppState::new(config, registry).unwrap());
    let image = horizontal_ramp();

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "face.png",
                data: &image,
            },
            Part::Text {
                name: "algo-sel",
                value: "svm",
            },
        ],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_text(response).await;
    assert_eq!(body, "Internal Server Error");
    assert!(!body.contains("absent"));
}

#[tokio::test]
async fn test_undecodable_upload_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "notes.png",
                data: b"this is not an image",
            },
            Part::Text {
                name: "algo-sel",
                value: "svm",
            },
        ],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upload_over_ten_mib_within_configured_limit() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), CachePolicy::Shared);
    config.server.max_upload_bytes = 64 * 1024 * 1024;
    let registry = ModelRegistry::with_loader(
        StubLoader::new(0, StubNetwork::Fixed(vec![1, 1], 1.0)),
        CachePolicy::Shared,
    );
    let state = Arc::new(AppState::new(config, Arc::new(registry)).unwrap());

    // Bytes after IEND are ignored by the decoder but still count toward size
    let mut image = horizontal_ramp();
    image.resize(12 * 1024 * 1024, 0);

    let request = multipart_request(
        "/",
        &[
            Part::File {
                name: "file",
                filename: "large.png",
                data: &image,
            },
            Part::Text {
                name: "algo-sel",
                value: "cnn",
            },
        ],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<strong>CNN</strong>"));
    assert!(html.contains("<strong>Live</strong>"));
}

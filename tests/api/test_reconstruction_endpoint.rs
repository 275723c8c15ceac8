// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Reconstruction endpoint tests (POST /reconstruction)

use axum::http::StatusCode;
use liveness_web::{api::create_app, CachePolicy};
use tower::util::ServiceExt;

use crate::common::{
    body_text, horizontal_ramp, multipart_request, test_state, vertical_ramp, Part, StubLoader,
    StubNetwork, TEST_SIZE,
};

const DONE: &str = "Done with reconstruction successfully";

#[tokio::test]
async fn test_reconstruction_renders_composite() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );
    let image = horizontal_ramp();

    let request = multipart_request(
        "/reconstruction",
        &[Part::File {
            name: "file",
            filename: "face.png",
            data: &image,
        }],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(DONE));
    assert!(html.contains("/get_image/reconstructed.png"));
    assert!(html.contains("Original Image face.png"));
    assert!(html.contains("Reconstructed Image"));

    let composite = image::open(dir.path().join("reconstructed.png"))
        .unwrap()
        .to_luma8();
    assert_eq!(composite.height(), TEST_SIZE);
    assert!(composite.width() > 2 * TEST_SIZE);
    // The upload itself is kept too
    assert!(dir.path().join("face.png").is_file());
}

#[tokio::test]
async fn test_second_run_overwrites_output() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );
    let output = dir.path().join("reconstructed.png");

    let first = horizontal_ramp();
    let request = multipart_request(
        "/reconstruction",
        &[Part::File {
            name: "file",
            filename: "first.png",
            data: &first,
        }],
    );
    let response = create_app(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first_output = std::fs::read(&output).unwrap();

    let second = vertical_ramp();
    let request = multipart_request(
        "/reconstruction",
        &[Part::File {
            name: "file",
            filename: "second.png",
            data: &second,
        }],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second_output = std::fs::read(&output).unwrap();

    assert_ne!(first_output, second_output);

    // Left panel now follows the vertical ramp of the second upload
    let composite = image::load_from_memory(&second_output).unwrap().to_luma8();
    assert_eq!(composite.get_pixel(0, 0)[0], 0);
    assert_eq!(composite.get_pixel(0, TEST_SIZE - 1)[0], 255);
    assert_eq!(composite.get_pixel(TEST_SIZE - 1, 0)[0], 0);
}

#[tokio::test]
async fn test_reconstruction_missing_file_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Identity),
        CachePolicy::Shared,
    );

    let request = multipart_request(
        "/reconstruction",
        &[Part::Text {
            name: "comment",
            value: "no file here",
        }],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!dir.path().join("reconstructed.png").exists());
}

#[tokio::test]
async fn test_non_image_output_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(
        dir.path(),
        StubLoader::new(0, StubNetwork::Fixed(vec![1, 10], 0.5)),
        CachePolicy::Shared,
    );
    let image = horizontal_ramp();

    let request = multipart_request(
        "/reconstruction",
        &[Part::File {
            name: "file",
            filename: "face.png",
            data: &image,
        }],
    );
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal Server Error");
}

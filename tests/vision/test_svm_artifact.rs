// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SVM artifact tests: LBP features from real pixels through a JSON model

use image::{GrayImage, Luma};
use liveness_web::models::{Classifier, Kernel, SvmArtifact, SvmClassifier};
use liveness_web::vision::LocalBinaryPatterns;
use std::io::Write;

/// RBF model with one support vector per class, built from two reference textures
fn artifact(live: Vec<f64>, fake: Vec<f64>) -> SvmArtifact {
    SvmArtifact {
        kernel: Kernel::Rbf { gamma: 10.0 },
        classes: vec![0, 1],
        n_support: vec![1, 1],
        support_vectors: vec![fake, live],
        dual_coef: vec![vec![1.0, -1.0]],
        intercept: vec![0.0],
    }
}

#[test]
fn test_lbp_features_classified_by_nearest_texture() {
    let lbp = LocalBinaryPatterns::new(24, 8.0).unwrap();

    let flat = GrayImage::from_pixel(48, 48, Luma([120]));
    let stripes = GrayImage::from_fn(48, 48, |x, _| Luma([if x % 4 < 2 { 20 } else { 230 }]));

    let flat_features = lbp.describe(&flat).unwrap();
    let stripe_features = lbp.describe(&stripes).unwrap();

    let model = artifact(
        stripe_features.clone().into_inner(),
        flat_features.clone().into_inner(),
    );

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&model).unwrap().as_bytes())
        .unwrap();
    let svm = SvmClassifier::load(file.path()).unwrap();

    assert_eq!(svm.n_features(), 26);
    assert_eq!(svm.predict(&flat_features).unwrap(), 0);
    assert_eq!(svm.predict(&stripe_features).unwrap(), 1);
}

#[test]
fn test_feature_count_must_match_lbp_points() {
    let lbp = LocalBinaryPatterns::new(8, 1.0).unwrap();
    let features = lbp
        .describe(&GrayImage::from_pixel(10, 10, Luma([5])))
        .unwrap();

    let model = artifact(vec![0.0; 26], vec![1.0; 26]);
    let svm = SvmClassifier::from_artifact(model).unwrap();
    assert!(svm.predict(&features).is_err());
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model loading
//!
//! Three artifacts back the pipelines:
//! - an SVM over LBP histograms, exported as JSON
//! - a CNN liveness classifier, exported as ONNX
//! - a reconstruction autoencoder, exported as ONNX
//!
//! Handlers never touch artifacts directly; they ask the
//! [`ModelRegistry`] for a [`Classifier`] or [`TensorModel`].

pub mod errors;
pub mod onnx;
pub mod registry;
pub mod svm;

use ndarray::{Array4, ArrayD};
use serde::Serialize;

use crate::inference::InferenceError;
use crate::vision::FeatureVector;

pub use errors::ModelLoadError;
pub use onnx::OnnxNetwork;
pub use registry::{ArtifactLoader, ModelInfo, ModelLoader, ModelRegistry};
pub use svm::{Kernel, SvmArtifact, SvmClassifier};

/// Predicts a class label from a feature vector
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError>;
}

/// Maps an NHWC input tensor to an output tensor
pub trait TensorModel: Send + Sync {
    fn predict(&self, input: Array4<f32>) -> Result<ArrayD<f32>, InferenceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Classifier,
    Network,
}

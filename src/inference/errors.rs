// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inference error types

use thiserror::Error;

use crate::models::ModelLoadError;
use crate::vision::{ImageError, LbpError};

/// Failures while running a loaded model on an upload
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Uploaded image could not be read: {0}")]
    UnreadableImage(#[from] ImageError),

    #[error("Feature extraction failed: {0}")]
    Features(#[from] LbpError),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Model runtime failed: {0}")]
    Runtime(String),

    #[error("Model produced an empty output")]
    EmptyOutput,

    #[error("Classifier returned unknown class {0}")]
    UnknownClass(i64),
}

/// Anything that can stop a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

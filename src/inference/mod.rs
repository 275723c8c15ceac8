// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inference routing for uploaded images
//!
//! An upload goes through exactly one pipeline:
//! - `Svm`: grayscale → LBP histogram → SVM class → label
//! - `Cnn`: RGB 128×128 tensor → CNN output → decision rule → label
//! - reconstruction: first channel 224×224 → autoencoder → image planes

pub mod errors;
pub mod router;

use ndarray::Array2;
use serde::Serialize;
use std::fmt;

pub use errors::{InferenceError, PipelineError};
pub use router::InferenceRouter;

/// Classification pipeline picked by the index form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Svm,
    Cnn,
}

impl Pipeline {
    /// `"svm"` selects the SVM; any other value falls through to the CNN
    pub fn from_selector(selector: &str) -> Self {
        if selector == "svm" {
            Pipeline::Svm
        } else {
            Pipeline::Cnn
        }
    }

    pub fn model(self) -> ModelKind {
        match self {
            Pipeline::Svm => ModelKind::Svm,
            Pipeline::Cnn => ModelKind::Cnn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelKind {
    Svm,
    Cnn,
    Autoencoder,
}

impl ModelKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Svm => "SVM",
            ModelKind::Cnn => "CNN",
            ModelKind::Autoencoder => "Autoencoder",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Liveness {
    Live,
    Fake,
}

impl Liveness {
    /// Class 1 is a live capture, class 0 a spoof
    pub fn from_class(class: i64) -> Result<Self, InferenceError> {
        match class {
            1 => Ok(Liveness::Live),
            0 => Ok(Liveness::Fake),
            other => Err(InferenceError::UnknownClass(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Liveness::Live => "Live",
            Liveness::Fake => "Fake",
        }
    }
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub model: ModelKind,
    pub label: Liveness,
}

/// Autoencoder input and output as `[H, W]` planes
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub source_filename: String,
    pub original: Array2<f32>,
    pub reconstructed: Array2<f32>,
    pub mean_squared_error: f32,
}

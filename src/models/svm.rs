// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Support-vector classifier evaluated from an exported JSON artifact
//!
//! The artifact carries the fitted support vectors and coefficients in
//! libsvm layout: support vectors grouped by class (`n_support` per class),
//! `dual_coef` with `n_classes - 1` rows and one column per support vector,
//! and one `intercept` per class pair. Pair `(i, j)` votes for class `i`
//! when `Σ coef · K(sv, x) + intercept > 0`, otherwise for `j`; the class
//! with the most votes wins (first one on ties).
//!
//! Signs follow libsvm (`intercept` is `-rho`). When exporting a fitted
//! scikit-learn `SVC`, take `_dual_coef_` and `_intercept_`, not the public
//! `dual_coef_`/`intercept_`: for two classes the public pair is negated and
//! would invert every label.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use super::errors::ModelLoadError;
use super::Classifier;
use crate::inference::InferenceError;
use crate::vision::FeatureVector;

/// Kernel function with its fitted hyper-parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { gamma: f64, coef0: f64, degree: i32 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    pub fn eval(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf { gamma } => {
                let dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * dist).exp()
            }
            Kernel::Poly {
                gamma,
                coef0,
                degree,
            } => (gamma * dot(a, b) + coef0).powi(*degree),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Serialized form of a fitted SVM
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SvmArtifact {
    pub kernel: Kernel,
    /// Class labels in training order
    pub classes: Vec<i64>,
    /// Support vectors per class, same order as `classes`
    pub n_support: Vec<usize>,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl SvmArtifact {
    fn validate(&self) -> Result<usize, String> {
        let n_classes = self.classes.len();
        if n_classes < 2 {
            return Err(format!("need at least 2 classes, got {}", n_classes));
        }

        if self.n_support.len() != n_classes {
            return Err(format!(
                "n_support has {} entries for {} classes",
                self.n_support.len(),
                n_classes
            ));
        }

        let n_sv: usize = self.n_support.iter().sum();
        if n_sv != self.support_vectors.len() || n_sv == 0 {
            return Err(format!(
                "n_support sums to {} but {} support vectors are stored",
                n_sv,
                self.support_vectors.len()
            ));
        }

        let n_features = self.support_vectors[0].len();
        if n_features == 0 || self.support_vectors.iter().any(|sv| sv.len() != n_features) {
            return Err("support vectors must share a non-zero length".to_string());
        }

        if self.dual_coef.len() != n_classes - 1
            || self.dual_coef.iter().any(|row| row.len() != n_sv)
        {
            return Err(format!(
                "dual_coef must be {}x{}",
                n_classes - 1,
                n_sv
            ));
        }

        let n_pairs = n_classes * (n_classes - 1) / 2;
        if self.intercept.len() != n_pairs {
            return Err(format!(
                "expected {} intercepts, got {}",
                n_pairs,
                self.intercept.len()
            ));
        }

        Ok(n_features)
    }
}

/// SVM ready for prediction
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    artifact: SvmArtifact,
    /// Index of each class's first support vector
    starts: Vec<usize>,
    n_features: usize,
}

impl SvmClassifier {
    /// Read and validate a JSON artifact
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound(path.display().to_string()));
        }

        debug!("Loading SVM artifact from {}", path.display());

        let content = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let artifact: SvmArtifact =
            serde_json::from_slice(&content).map_err(|e| ModelLoadError::InvalidArtifact {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let classifier =
            Self::from_artifact(artifact).map_err(|reason| ModelLoadError::InvalidArtifact {
                path: path.display().to_string(),
                reason,
            })?;

        info!(
            "SVM loaded: {} classes, {} support vectors, {} features",
            classifier.artifact.classes.len(),
            classifier.artifact.support_vectors.len(),
            classifier.n_features
        );

        Ok(classifier)
    }

    pub fn from_artifact(artifact: SvmArtifact) -> Result<Self, String> {
        let n_features = artifact.validate()?;

        let starts = artifact
            .n_support
            .iter()
            .scan(0usize, |offset, count| {
                let start = *offset;
                *offset += count;
                Some(start)
            })
            .collect();

        Ok(Self {
            artifact,
            starts,
            n_features,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[i64] {
        &self.artifact.classes
    }

    /// One decision value per class pair, in `(0,1), (0,2), ..., (1,2), ...` order
    pub fn decision_values(&self, x: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if x.len() != self.n_features {
            return Err(InferenceError::ShapeMismatch {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.len()),
            });
        }

        let artifact = &self.artifact;
        let kvalues: Vec<f64> = artifact
            .support_vectors
            .iter()
            .map(|sv| artifact.kernel.eval(sv, x))
            .collect();

        let n_classes = artifact.classes.len();
        let mut decisions = Vec::with_capacity(artifact.intercept.len());
        let mut pair = 0;

        for i in 0..n_classes {
            for j in (i + 1)..n_classes {
                let (si, ci) = (self.starts[i], artifact.n_support[i]);
                let (sj, cj) = (self.starts[j], artifact.n_support[j]);
                let coef_i = &artifact.dual_coef[j - 1];
                let coef_j = &artifact.dual_coef[i];

                let mut sum: f64 = (si..si + ci).map(|k| coef_i[k] * kvalues[k]).sum();
                sum += (sj..sj + cj).map(|k| coef_j[k] * kvalues[k]).sum::<f64>();
                sum += artifact.intercept[pair];

                decisions.push(sum);
                pair += 1;
            }
        }

        Ok(decisions)
    }
}

impl Classifier for SvmClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        let decisions = self.decision_values(features.as_slice())?;
        let n_classes = self.artifact.classes.len();

        let mut votes = vec![0usize; n_classes];
        let mut pair = 0;
        for i in 0..n_classes {
            for j in (i + 1)..n_classes {
                if decisions[pair] > 0.0 {
                    votes[i] += 1;
                } else {
                    votes[j] += 1;
                }
                pair += 1;
            }
        }

        let mut winner = 0;
        for (idx, count) in votes.iter().enumerate() {
            if *count > votes[winner] {
                winner = idx;
            }
        }

        Ok(self.artifact.classes[winner])
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime wrapper for the CNN classifier and the reconstruction autoencoder
//!
//! Both networks are exported to ONNX with a single NHWC `f32` input and
//! a single `f32` output. Sessions run on the CPU execution provider.

use ndarray::{Array4, ArrayD};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::errors::ModelLoadError;
use super::TensorModel;
use crate::inference::InferenceError;

/// Loaded ONNX network
pub struct OnnxNetwork {
    /// Session needs `&mut` to run, so it sits behind a mutex
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
    path: PathBuf,
}

impl std::fmt::Debug for OnnxNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxNetwork")
            .field("path", &self.path)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish()
    }
}

fn build_session(path: &Path) -> ort::Result<Session> {
    Session::builder()?
        .with_execution_providers([CPUExecutionProvider::default().build()])?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(4)?
        .commit_from_file(path)
}

impl OnnxNetwork {
    /// Load an ONNX network from disk
    ///
    /// # Errors
    /// - `NotFound` if the file does not exist
    /// - `Runtime` if ONNX Runtime cannot build a session from it
    /// - `InvalidArtifact` if the graph declares no inputs or outputs
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound(path.display().to_string()));
        }

        info!("Loading ONNX network from {}", path.display());

        let session = build_session(path).map_err(|e| ModelLoadError::Runtime {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ModelLoadError::InvalidArtifact {
                path: path.display().to_string(),
                reason: "graph declares no inputs".to_string(),
            })?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| ModelLoadError::InvalidArtifact {
                path: path.display().to_string(),
                reason: "graph declares no outputs".to_string(),
            })?;

        if let Some(input) = session.inputs.first() {
            debug!("Network input shape: {:?}", input.input_type);
        }

        debug!(
            "Network loaded - input: {}, output: {}",
            input_name, output_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }
}

impl TensorModel for OnnxNetwork {
    fn predict(&self, input: Array4<f32>) -> Result<ArrayD<f32>, InferenceError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Runtime("session lock poisoned".to_string()))?;

        let input_value = Value::from_array(input)
            .map_err(|e| InferenceError::Runtime(format!("failed to create input tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("failed to extract output: {}", e)))?;

        debug!("Network output shape: {:?}", output.shape());

        Ok(output.to_owned())
    }
}

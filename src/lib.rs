// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod inference;
pub mod models;
pub mod storage;
pub mod version;
pub mod vision;

// Re-export main types for convenience
pub use api::{create_app, start_server, AppState};
pub use config::{AppConfig, CachePolicy, ConfigError, LivenessDecision};
pub use inference::{
    Classification, InferenceError, InferenceRouter, Liveness, ModelKind, Pipeline,
    PipelineError, Reconstruction,
};
pub use models::{Classifier, ModelLoadError, ModelLoader, ModelRegistry, TensorModel};
pub use storage::{sanitize_filename, StoredUpload, UploadError, UploadStore};
pub use vision::{FeatureVector, LocalBinaryPatterns};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for model artifact loading

use thiserror::Error;

/// Errors raised while turning an artifact on disk into a usable model
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// Artifact path does not exist
    #[error("Model artifact not found: {0}")]
    NotFound(String),

    /// Artifact exists but could not be read
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Artifact was read but its contents are unusable
    #[error("Invalid model artifact {path}: {reason}")]
    InvalidArtifact { path: String, reason: String },

    /// Inference runtime rejected the artifact
    #[error("Failed to initialise runtime for {path}: {reason}")]
    Runtime { path: String, reason: String },
}

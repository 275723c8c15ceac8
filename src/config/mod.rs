// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Application configuration
//!
//! Every component receives its settings from an [`AppConfig`] at
//! construction. Values are layered: built-in defaults, then an optional
//! TOML file, then environment variables, then CLI flags (applied by
//! [`crate::cli::Cli::load_config`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum upload size (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory receiving uploads and the reconstruction composite
    pub upload_dir: PathBuf,
    /// File name of the reconstruction composite, overwritten on every run
    pub reconstruction_output: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("web/static/uploads"),
            reconstruction_output: "reconstructed.png".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn reconstruction_output_path(&self) -> PathBuf {
        self.upload_dir.join(&self.reconstruction_output)
    }
}

/// How loaded models are kept between requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Load once, share read-only across requests
    #[default]
    Shared,
    /// Deserialize the artifact again for every request
    PerRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelPaths {
    /// SVM artifact (JSON)
    pub svm: PathBuf,
    /// CNN liveness classifier (ONNX)
    pub cnn: PathBuf,
    /// Reconstruction autoencoder (ONNX)
    pub autoencoder: PathBuf,
    pub cache: CachePolicy,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            svm: PathBuf::from("model/SVM_rbf.json"),
            cnn: PathBuf::from("model/CNN_classification.onnx"),
            autoencoder: PathBuf::from("model/Reconstructing.onnx"),
            cache: CachePolicy::Shared,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LbpConfig {
    pub points: usize,
    pub radius: f64,
}

impl Default for LbpConfig {
    fn default() -> Self {
        Self {
            points: 24,
            radius: 8.0,
        }
    }
}

/// Rule turning the CNN's first output value into a liveness label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum LivenessDecision {
    /// `Live` only when the output is exactly 1.0
    #[default]
    ExactMatch,
    /// `Live` when the output is at least `cutoff`
    Threshold { cutoff: f32 },
}

impl LivenessDecision {
    pub fn is_live(&self, value: f32) -> bool {
        match self {
            LivenessDecision::ExactMatch => value == 1.0,
            LivenessDecision::Threshold { cutoff } => value >= *cutoff,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CnnConfig {
    /// Square input resolution
    pub input_size: u32,
    pub decision: LivenessDecision,
}

impl Default for CnnConfig {
    fn default() -> Self {
        Self {
            input_size: 128,
            decision: LivenessDecision::ExactMatch,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Square input resolution
    pub input_size: u32,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self { input_size: 224 }
    }
}

/// Top-level configuration handed to every component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub models: ModelPaths,
    pub lbp: LbpConfig,
    pub cnn: CnnConfig,
    pub reconstruction: ReconstructionConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file; missing sections keep defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply environment overrides on top of the current values
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(val) = std::env::var("LIVENESS_HOST") {
            self.server.host = val;
        }

        if let Ok(val) = std::env::var("LIVENESS_PORT") {
            self.server.port = parse_env("LIVENESS_PORT", &val)?;
        }

        if let Ok(val) = std::env::var("LIVENESS_MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = parse_env("LIVENESS_MAX_UPLOAD_BYTES", &val)?;
        }

        if let Ok(val) = std::env::var("LIVENESS_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("LIVENESS_SVM_MODEL") {
            self.models.svm = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("LIVENESS_CNN_MODEL") {
            self.models.cnn = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("LIVENESS_AUTOENCODER_MODEL") {
            self.models.autoencoder = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("LIVENESS_CNN_CUTOFF") {
            let cutoff = parse_env("LIVENESS_CNN_CUTOFF", &val)?;
            self.cnn.decision = LivenessDecision::Threshold { cutoff };
        }

        Ok(self)
    }

    /// Reject values the pipelines cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lbp.points == 0 {
            return Err(ConfigError::Invalid {
                field: "lbp.points".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if !(self.lbp.radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "lbp.radius".to_string(),
                message: format!("must be positive, got {}", self.lbp.radius),
            });
        }

        if self.cnn.input_size == 0 || self.reconstruction.input_size == 0 {
            return Err(ConfigError::Invalid {
                field: "input_size".to_string(),
                message: "network input sizes must be non-zero".to_string(),
            });
        }

        let output = Path::new(&self.storage.reconstruction_output);
        if output.file_name().map(|n| n != output.as_os_str()).unwrap_or(true) {
            return Err(ConfigError::Invalid {
                field: "storage.reconstruction_output".to_string(),
                message: "must be a bare file name".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        field: name.to_string(),
        message: format!("cannot parse '{}'", value),
    })
}

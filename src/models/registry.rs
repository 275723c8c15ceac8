// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model registry: loads artifacts through a [`ModelLoader`] and caches them by path

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::errors::ModelLoadError;
use super::onnx::OnnxNetwork;
use super::svm::SvmClassifier;
use super::{ArtifactKind, Classifier, TensorModel};
use crate::config::{CachePolicy, ModelPaths};

/// Turns artifact paths into ready models
pub trait ModelLoader: Send + Sync {
    fn load_classifier(&self, path: &Path) -> Result<Arc<dyn Classifier>, ModelLoadError>;
    fn load_network(&self, path: &Path) -> Result<Arc<dyn TensorModel>, ModelLoadError>;
}

/// Loads JSON SVM artifacts and ONNX networks from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct ArtifactLoader;

impl ModelLoader for ArtifactLoader {
    fn load_classifier(&self, path: &Path) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        Ok(Arc::new(SvmClassifier::load(path)?))
    }

    fn load_network(&self, path: &Path) -> Result<Arc<dyn TensorModel>, ModelLoadError> {
        Ok(Arc::new(OnnxNetwork::load(path)?))
    }
}

/// Information about a configured model
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub kind: ArtifactKind,
    pub path: String,
    /// Whether the model is currently held in the cache
    pub loaded: bool,
}

/// Cache of loaded models keyed by artifact path
///
/// Under [`CachePolicy::Shared`] each artifact is loaded at most once and
/// the same instance is handed to every request. Under
/// [`CachePolicy::PerRequest`] nothing is cached. Loads run on the blocking
/// pool; a cache miss holds the write lock until its load finishes, so
/// concurrent requests for the same artifact wait instead of loading twice.
pub struct ModelRegistry {
    loader: Arc<dyn ModelLoader>,
    policy: CachePolicy,
    classifiers: RwLock<HashMap<PathBuf, Arc<dyn Classifier>>>,
    networks: RwLock<HashMap<PathBuf, Arc<dyn TensorModel>>>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ModelRegistry {
    pub fn new(policy: CachePolicy) -> Self {
        Self::with_loader(Arc::new(ArtifactLoader), policy)
    }

    pub fn with_loader(loader: Arc<dyn ModelLoader>, policy: CachePolicy) -> Self {
        Self {
            loader,
            policy,
            classifiers: RwLock::new(HashMap::new()),
            networks: RwLock::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Run a load on a blocking thread; artifact reads and session builds are synchronous
    async fn load_blocking<T, F>(&self, path: &Path, load: F) -> Result<T, ModelLoadError>
    where
        F: FnOnce(&dyn ModelLoader, &Path) -> Result<T, ModelLoadError> + Send + 'static,
        T: Send + 'static,
    {
        let loader = self.loader.clone();
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || load(loader.as_ref(), &owned))
            .await
            .map_err(|e| ModelLoadError::Runtime {
                path: path.display().to_string(),
                reason: format!("load task failed: {}", e),
            })?
    }

    /// Get the classifier stored at `path`, loading it on first use
    pub async fn classifier(&self, path: &Path) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        if self.policy == CachePolicy::PerRequest {
            return self
                .load_blocking(path, |loader, path| loader.load_classifier(path))
                .await;
        }

        if let Some(model) = self.classifiers.read().await.get(path) {
            return Ok(model.clone());
        }

        let mut cache = self.classifiers.write().await;
        // Another request may have loaded it while we waited for the write lock
        if let Some(model) = cache.get(path) {
            return Ok(model.clone());
        }

        debug!("Classifier cache miss for {}", path.display());
        let model = self
            .load_blocking(path, |loader, path| loader.load_classifier(path))
            .await?;
        cache.insert(path.to_path_buf(), model.clone());
        Ok(model)
    }

    /// Get the network stored at `path`, loading it on first use
    pub async fn network(&self, path: &Path) -> Result<Arc<dyn TensorModel>, ModelLoadError> {
        if self.policy == CachePolicy::PerRequest {
            return self
                .load_blocking(path, |loader, path| loader.load_network(path))
                .await;
        }

        if let Some(model) = self.networks.read().await.get(path) {
            return Ok(model.clone());
        }

        let mut cache = self.networks.write().await;
        if let Some(model) = cache.get(path) {
            return Ok(model.clone());
        }

        debug!("Network cache miss for {}", path.display());
        let model = self
            .load_blocking(path, |loader, path| loader.load_network(path))
            .await?;
        cache.insert(path.to_path_buf(), model.clone());
        Ok(model)
    }

    /// Load every configured model up front
    ///
    /// Failures are logged, not returned: a missing artifact only breaks
    /// the pipeline that needs it, and that request reports the error.
    pub async fn warm_up(&self, paths: &ModelPaths) {
        if self.policy == CachePolicy::PerRequest {
            info!("Model cache disabled, artifacts load on each request");
            return;
        }

        match self.classifier(&paths.svm).await {
            Ok(_) => info!("✅ SVM classifier loaded from {}", paths.svm.display()),
            Err(e) => warn!("⚠️ Failed to load SVM classifier: {}", e),
        }

        match self.network(&paths.cnn).await {
            Ok(_) => info!("✅ CNN classifier loaded from {}", paths.cnn.display()),
            Err(e) => warn!("⚠️ Failed to load CNN classifier: {}", e),
        }

        match self.network(&paths.autoencoder).await {
            Ok(_) => info!(
                "✅ Reconstruction autoencoder loaded from {}",
                paths.autoencoder.display()
            ),
            Err(e) => warn!("⚠️ Failed to load reconstruction autoencoder: {}", e),
        }
    }

    pub async fn is_loaded(&self, path: &Path, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Classifier => self.classifiers.read().await.contains_key(path),
            ArtifactKind::Network => self.networks.read().await.contains_key(path),
        }
    }

    /// List the configured models and whether each one is cached
    pub async fn list_models(&self, paths: &ModelPaths) -> Vec<ModelInfo> {
        let entries = [
            ("svm", ArtifactKind::Classifier, &paths.svm),
            ("cnn", ArtifactKind::Network, &paths.cnn),
            ("autoencoder", ArtifactKind::Network, &paths.autoencoder),
        ];

        let mut models = Vec::with_capacity(entries.len());
        for (name, kind, path) in entries {
            models.push(ModelInfo {
                name: name.to_string(),
                kind,
                path: path.display().to_string(),
                loaded: self.is_loaded(path, kind).await,
            });
        }
        models
    }
}

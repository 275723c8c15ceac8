// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Dispatches a stored upload to the SVM, CNN or reconstruction pipeline

use image::DynamicImage;
use ndarray::{ArrayD, Ix4};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    Classification, InferenceError, Liveness, ModelKind, Pipeline, PipelineError, Reconstruction,
};
use crate::config::{AppConfig, CnnConfig, ModelPaths, ReconstructionConfig};
use crate::models::ModelRegistry;
use crate::vision::preprocessing::first_plane;
use crate::vision::{
    decode_image_bytes, preprocess_for_cnn, preprocess_for_reconstruction, read_image_file,
    to_grayscale, LbpError, LocalBinaryPatterns,
};

/// Request-scoped pipeline runner over a shared [`ModelRegistry`]
#[derive(Debug)]
pub struct InferenceRouter {
    models: Arc<ModelRegistry>,
    paths: ModelPaths,
    lbp: LocalBinaryPatterns,
    cnn: CnnConfig,
    reconstruction: ReconstructionConfig,
}

impl InferenceRouter {
    pub fn new(models: Arc<ModelRegistry>, config: &AppConfig) -> Result<Self, LbpError> {
        Ok(Self {
            models,
            paths: config.models.clone(),
            lbp: LocalBinaryPatterns::new(config.lbp.points, config.lbp.radius)?,
            cnn: config.cnn.clone(),
            reconstruction: config.reconstruction.clone(),
        })
    }

    pub fn models(&self) -> &Arc<ModelRegistry> {
        &self.models
    }

    pub fn model_paths(&self) -> &ModelPaths {
        &self.paths
    }

    /// Classify the image at `upload` as live or fake
    pub async fn classify(
        &self,
        pipeline: Pipeline,
        upload: &Path,
    ) -> Result<Classification, PipelineError> {
        let label = match pipeline {
            Pipeline::Svm => self.run_svm(upload).await?,
            Pipeline::Cnn => self.run_cnn(upload).await?,
        };

        info!(
            "{} classified {} as {}",
            pipeline.model(),
            upload.display(),
            label
        );

        Ok(Classification {
            model: pipeline.model(),
            label,
        })
    }

    /// Read `upload`, then decode and prepare it on a blocking thread
    async fn prepare_upload<T, F>(&self, upload: &Path, prepare: F) -> Result<T, InferenceError>
    where
        F: FnOnce(DynamicImage) -> Result<T, InferenceError> + Send + 'static,
        T: Send + 'static,
    {
        let bytes = read_image_file(upload).await?;
        run_blocking(move || {
            let (image, info) = decode_image_bytes(&bytes)?;
            debug!(
                "Decoded {}x{} {:?} upload ({} bytes)",
                info.width, info.height, info.format, info.size_bytes
            );
            prepare(image)
        })
        .await
    }

    async fn run_svm(&self, upload: &Path) -> Result<Liveness, PipelineError> {
        let lbp = self.lbp.clone();
        let features = self
            .prepare_upload(upload, move |image| {
                Ok(lbp.describe(&to_grayscale(&image))?)
            })
            .await?;
        debug!("LBP histogram with {} bins", features.len());

        let classifier = self.models.classifier(&self.paths.svm).await?;
        let class = run_blocking(move || classifier.predict(&features)).await?;

        Ok(Liveness::from_class(class)?)
    }

    async fn run_cnn(&self, upload: &Path) -> Result<Liveness, PipelineError> {
        let size = self.cnn.input_size;
        let input = self
            .prepare_upload(upload, move |image| Ok(preprocess_for_cnn(&image, size)))
            .await?;

        let network = self.models.network(&self.paths.cnn).await?;
        let output = run_blocking(move || network.predict(input)).await?;

        let value = output
            .iter()
            .next()
            .copied()
            .ok_or(InferenceError::EmptyOutput)?;
        debug!("CNN output value {}", value);

        Ok(if self.cnn.decision.is_live(value) {
            Liveness::Live
        } else {
            Liveness::Fake
        })
    }

    /// Run the autoencoder on the image at `upload`
    pub async fn reconstruct(&self, upload: &Path) -> Result<Reconstruction, PipelineError> {
        let size = self.reconstruction.input_size;
        let (input, original) = self
            .prepare_upload(upload, move |image| {
                let input = preprocess_for_reconstruction(&image, size);
                let original = first_plane(input.view());
                Ok((input, original))
            })
            .await?;

        let network = self.models.network(&self.paths.autoencoder).await?;
        let output = run_blocking(move || network.predict(input)).await?;
        let reconstructed = output_plane(output)?;

        if reconstructed.dim() != original.dim() {
            return Err(InferenceError::ShapeMismatch {
                expected: format!("{:?}", original.dim()),
                actual: format!("{:?}", reconstructed.dim()),
            }
            .into());
        }

        let mean_squared_error = (&original - &reconstructed)
            .mapv(|d| d * d)
            .mean()
            .unwrap_or(0.0);

        info!(
            "{} reconstructed {} (mse {:.6})",
            ModelKind::Autoencoder,
            upload.display(),
            mean_squared_error
        );

        Ok(Reconstruction {
            source_filename: upload
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            original,
            reconstructed,
            mean_squared_error,
        })
    }
}

/// Plane `[0, .., .., 0]` of a 4D NHWC output
fn output_plane(output: ArrayD<f32>) -> Result<ndarray::Array2<f32>, InferenceError> {
    let shape = output.shape().to_vec();
    let output = output
        .into_dimensionality::<Ix4>()
        .map_err(|_| InferenceError::ShapeMismatch {
            expected: "[1, H, W, C]".to_string(),
            actual: format!("{:?}", shape),
        })?;

    if output.is_empty() {
        return Err(InferenceError::EmptyOutput);
    }

    Ok(first_plane(output.view()))
}

async fn run_blocking<T, F>(f: F) -> Result<T, InferenceError>
where
    F: FnOnce() -> Result<T, InferenceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| InferenceError::Runtime(format!("inference task failed: {}", e)))?
}

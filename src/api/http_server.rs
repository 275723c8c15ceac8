// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::classify::{classify_handler, index_handler};
use super::handlers::{health_handler, matching_handler};
use super::images::get_image_handler;
use super::reconstruction::{reconstruction_form_handler, reconstruction_handler};
use crate::config::AppConfig;
use crate::inference::InferenceRouter;
use crate::models::ModelRegistry;
use crate::storage::UploadStore;
use crate::vision::LbpError;

/// Shared state handed to every handler
#[derive(Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub uploads: UploadStore,
    pub router: InferenceRouter,
}

impl AppState {
    pub fn new(config: AppConfig, models: Arc<ModelRegistry>) -> Result<Self, LbpError> {
        let router = InferenceRouter::new(models, &config)?;
        let uploads = UploadStore::new(config.storage.upload_dir.clone());

        Ok(Self {
            config: Arc::new(config),
            uploads,
            router,
        })
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        // Classification
        .route("/", get(index_handler).post(classify_handler))
        // Static matching page
        .route("/matching", get(matching_handler).post(matching_handler))
        // Autoencoder reconstruction
        .route(
            "/reconstruction",
            get(reconstruction_form_handler).post(reconstruction_handler),
        )
        // Uploaded and generated images
        .route("/get_image/:filename", get(get_image_handler))
        // Health check
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: Arc<AppState>) -> std::io::Result<()> {
    let addr = state.config.server.listen_addr();
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await
}

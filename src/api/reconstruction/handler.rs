// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Reconstruction handlers

use axum::extract::State;
use axum::response::Html;
use axum_extra::extract::Multipart;
use std::sync::Arc;
use tracing::info;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::pages;
use crate::api::upload::read_upload_form;
use crate::vision::render_comparison;

/// GET /reconstruction - Empty upload form
pub async fn reconstruction_form_handler() -> Html<String> {
    pages::reconstruction_page(None)
}

/// POST /reconstruction - Reconstruct the upload and render the comparison
///
/// The comparison image always goes to the same file in the upload
/// directory, replacing the previous run's output.
pub async fn reconstruction_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let form = read_upload_form(multipart).await?;
    let stored = state.uploads.save(&form.filename, &form.data).await?;
    let reconstruction = state.router.reconstruct(&stored.path).await?;

    let storage = &state.config.storage;
    render_comparison(
        reconstruction.original.clone(),
        reconstruction.reconstructed.clone(),
        storage.reconstruction_output_path(),
    )
    .await?;

    info!(
        "Reconstruction of {} written to {}",
        reconstruction.source_filename, storage.reconstruction_output
    );

    Ok(pages::reconstruction_page(Some((
        &reconstruction,
        storage.reconstruction_output.as_str(),
    ))))
}

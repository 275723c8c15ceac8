// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification handlers

use axum::extract::State;
use axum::response::Html;
use axum_extra::extract::Multipart;
use std::sync::Arc;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::pages;
use crate::api::upload::read_upload_form;
use crate::inference::Pipeline;

/// GET / - Empty upload form
pub async fn index_handler() -> Html<String> {
    pages::index_page(None)
}

/// POST / - Store the upload and classify it
///
/// # Errors
/// - 400 Bad Request: no file, no `algo-sel`, or an unusable filename
/// - 500 Internal Server Error: storage, model loading or inference failed
pub async fn classify_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let form = read_upload_form(multipart).await?;
    let pipeline = Pipeline::from_selector(form.selector()?);
    debug!("Classification requested with {:?}", pipeline);

    let stored = state.uploads.save(&form.filename, &form.data).await?;
    let classification = state.router.classify(pipeline, &stored.path).await?;

    Ok(pages::index_page(Some((&classification, stored.filename.as_str()))))
}

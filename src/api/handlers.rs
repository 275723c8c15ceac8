// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::http_server::AppState;
use super::pages;
use crate::models::ModelInfo;
use crate::version::VERSION_NUMBER;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub models: Vec<ModelInfo>,
}

/// GET|POST /matching - Static page
pub async fn matching_handler() -> Html<String> {
    pages::matching_page()
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let registry = state.router.models();
    let models = registry.list_models(state.router.model_paths()).await;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION_NUMBER.to_string(),
        models,
    })
}

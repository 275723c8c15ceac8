// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::multipart::MultipartError;
use std::fmt;
use tracing::{error, warn};

use crate::inference::PipelineError;
use crate::storage::UploadError;
use crate::vision::CompositeError;

/// Body sent for every server-side failure
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

#[derive(Debug)]
pub enum ApiError {
    Upload(UploadError),
    Multipart(MultipartError),
    Pipeline(PipelineError),
    Composite(CompositeError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upload(UploadError::MissingFile)
            | ApiError::Upload(UploadError::MissingField(_))
            | ApiError::Upload(UploadError::InvalidFilename(_)) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(err) => err.status(),
            ApiError::Upload(UploadError::Io { .. })
            | ApiError::Pipeline(_)
            | ApiError::Composite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the client for 4xx responses
    fn client_message(&self) -> String {
        match self {
            ApiError::Multipart(err) => err.body_text(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Upload(err) => write!(f, "{}", err),
            ApiError::Multipart(err) => write!(f, "Malformed multipart body: {}", err),
            ApiError::Pipeline(err) => write!(f, "Pipeline failed: {}", err),
            ApiError::Composite(err) => write!(f, "Rendering failed: {}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::Upload(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<CompositeError> for ApiError {
    fn from(err: CompositeError) -> Self {
        ApiError::Composite(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
            (status, INTERNAL_ERROR_BODY).into_response()
        } else {
            warn!("Request rejected: {}", self);
            (status, self.client_message()).into_response()
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload form parsing

use axum::body::Bytes;
use axum_extra::extract::Multipart;
use tracing::debug;

use super::errors::ApiError;
use crate::storage::UploadError;

/// Field carrying the image
pub const FILE_FIELD: &str = "file";

/// Field carrying the classifier selector on the index form
pub const SELECTOR_FIELD: &str = "algo-sel";

#[derive(Debug, Clone)]
pub struct UploadForm {
    /// Client-supplied name, not yet sanitized
    pub filename: String,
    pub data: Bytes,
    pub selector: Option<String>,
}

impl UploadForm {
    pub fn selector(&self) -> Result<&str, UploadError> {
        self.selector
            .as_deref()
            .ok_or_else(|| UploadError::MissingField(SELECTOR_FIELD.to_string()))
    }
}

/// Collect the `file` and `algo-sel` fields; other fields are ignored
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut selector = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                debug!("Received file field {:?} ({} bytes)", filename, data.len());
                file = Some((filename, data));
            }
            Some(SELECTOR_FIELD) => {
                selector = Some(field.text().await?);
            }
            other => {
                debug!("Ignoring form field {:?}", other);
            }
        }
    }

    match file {
        Some((filename, data)) if !(filename.is_empty() && data.is_empty()) => Ok(UploadForm {
            filename,
            data,
            selector,
        }),
        _ => Err(UploadError::MissingFile.into()),
    }
}

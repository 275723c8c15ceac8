// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! GET /get_image/:filename

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::api::http_server::AppState;
use crate::storage::{NotFoundError, UploadStore};
use crate::vision::content_type_for;

/// Bytes read to sniff the content type
const SNIFF_LEN: usize = 16;

/// Stream a stored upload back to the client
///
/// Unknown or non-sanitized names get a plain-text 404, never a 500.
pub async fn get_image_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    match open_upload(&state.uploads, &filename).await {
        Ok((file, content_type)) => (
            [(header::CONTENT_TYPE, content_type)],
            Body::from_stream(ReaderStream::new(file)),
        )
            .into_response(),
        Err(e) => {
            debug!("Image lookup failed: {}", e);
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
    }
}

async fn open_upload(
    store: &UploadStore,
    filename: &str,
) -> Result<(File, &'static str), NotFoundError> {
    let not_found = |_| NotFoundError(filename.to_string());

    let path = store.resolve(filename)?;
    let mut file = File::open(&path).await.map_err(not_found)?;

    let mut head = [0u8; SNIFF_LEN];
    let read = file.read(&mut head).await.map_err(not_found)?;
    file.rewind().await.map_err(not_found)?;

    Ok((file, content_type_for(&head[..read])))
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod classify;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod images;
pub mod pages;
pub mod reconstruction;
pub mod upload;

pub use errors::ApiError;
pub use handlers::HealthResponse;
pub use http_server::{create_app, start_server, AppState};
pub use upload::{read_upload_form, UploadForm};

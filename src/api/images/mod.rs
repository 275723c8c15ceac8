// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Serves files from the upload directory

pub mod handler;

pub use handler::get_image_handler;

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Autoencoder reconstruction endpoint

pub mod handler;

pub use handler::{reconstruction_form_handler, reconstruction_handler};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Liveness classification endpoint
//!
//! GET / renders the upload form, POST / classifies the upload with the
//! SVM or CNN pipeline picked by the `algo-sel` field.

pub mod handler;

pub use handler::{classify_handler, index_handler};

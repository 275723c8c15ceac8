// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module
//!
//! This module provides:
//! - Image decoding and content-type sniffing
//! - Uniform LBP texture features for the SVM pipeline
//! - Tensor preprocessing for the CNN and autoencoder pipelines
//! - Side-by-side compositing of reconstruction results

pub mod composite;
pub mod image_utils;
pub mod lbp;
pub mod preprocessing;

pub use composite::{render_comparison, CompositeError};
pub use image_utils::{content_type_for, decode_image_bytes, detect_format, read_image_file, ImageError, ImageInfo};
pub use lbp::{FeatureVector, LbpError, LocalBinaryPatterns};
pub use preprocessing::{preprocess_for_cnn, preprocess_for_reconstruction, to_grayscale};

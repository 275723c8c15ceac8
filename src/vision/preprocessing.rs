// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the CNN classifier and the reconstruction autoencoder
//!
//! Both networks take channels-last (NHWC) tensors. Resizing uses
//! nearest-neighbour sampling, the interpolation the networks were fed
//! with during training.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use ndarray::{Array2, Array4, ArrayView4, Axis};

/// Default CNN input resolution
pub const CNN_INPUT_SIZE: u32 = 128;

/// Default autoencoder input resolution
pub const RECONSTRUCTION_INPUT_SIZE: u32 = 224;

/// Grayscale view of an upload for LBP extraction
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Preprocess an image for the CNN classifier
///
/// Steps:
/// 1. Convert to RGB
/// 2. Resize to `size` x `size` (nearest neighbour)
/// 3. Copy raw 0-255 values into a `[1, size, size, 3]` tensor (no scaling)
pub fn preprocess_for_cnn(image: &DynamicImage, size: u32) -> Array4<f32> {
    let resized = image.resize_exact(size, size, FilterType::Nearest);
    let rgb = resized.to_rgb8();
    let side = size as usize;

    Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
        rgb.get_pixel(x as u32, y as u32)[c] as f32
    })
}

/// Preprocess an image for the reconstruction autoencoder
///
/// Steps:
/// 1. Convert to RGB and resize to `size` x `size` (nearest neighbour)
/// 2. Keep the first channel only
/// 3. Divide by the channel's own maximum (an all-zero plane stays zero)
/// 4. Shape as `[1, size, size, 1]`
pub fn preprocess_for_reconstruction(image: &DynamicImage, size: u32) -> Array4<f32> {
    let resized = image.resize_exact(size, size, FilterType::Nearest);
    let rgb = resized.to_rgb8();
    let side = size as usize;

    let mut tensor = Array4::from_shape_fn((1, side, side, 1), |(_, y, x, _)| {
        rgb.get_pixel(x as u32, y as u32)[0] as f32
    });

    let max = tensor.iter().cloned().fold(0.0f32, f32::max);
    if max > 0.0 {
        tensor.mapv_inplace(|v| v / max);
    }

    tensor
}

/// First image and first channel of an NHWC tensor as a `[H, W]` plane
pub fn first_plane(tensor: ArrayView4<f32>) -> Array2<f32> {
    tensor
        .index_axis(Axis(0), 0)
        .index_axis(Axis(2), 0)
        .to_owned()
}

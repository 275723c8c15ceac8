// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Side-by-side comparison image for reconstruction results

use image::{GrayImage, ImageFormat, Luma};
use ndarray::{Array2, ArrayView2};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// White column separating the two panels
pub const GUTTER_WIDTH: u32 = 16;

const BACKGROUND: Luma<u8> = Luma([255]);

#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("Composite target has no parent directory: {0}")]
    NoParent(String),

    #[error("Failed to write composite: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode composite: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Composite task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Min-max scale a plane to 8-bit grayscale (a flat plane renders black)
pub fn plane_to_gray(plane: ArrayView2<f32>) -> GrayImage {
    let (rows, cols) = plane.dim();
    let (min, max) = plane
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::MAX, f32::MIN), |(min, max), &v| (min.min(v), max.max(v)));
    let span = max - min;

    GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        let value = plane[[y as usize, x as usize]];
        if span > 0.0 && value.is_finite() {
            let scaled = ((value - min) / span * 255.0).round();
            Luma([scaled.clamp(0.0, 255.0) as u8])
        } else {
            Luma([0])
        }
    })
}

/// Original on the left, reconstruction on the right
pub fn side_by_side(original: ArrayView2<f32>, reconstructed: ArrayView2<f32>) -> GrayImage {
    let left = plane_to_gray(original);
    let right = plane_to_gray(reconstructed);

    let width = left.width() + GUTTER_WIDTH + right.width();
    let height = left.height().max(right.height());
    let mut canvas = GrayImage::from_pixel(width, height, BACKGROUND);

    image::imageops::replace(&mut canvas, &left, 0, 0);
    image::imageops::replace(
        &mut canvas,
        &right,
        (left.width() + GUTTER_WIDTH) as i64,
        0,
    );

    canvas
}

/// Encode as PNG and replace `path` in one rename
///
/// Concurrent writers each produce a complete file; the last rename wins.
pub fn write_png_replacing(image: &GrayImage, path: &Path) -> Result<(), CompositeError> {
    let dir = path
        .parent()
        .ok_or_else(|| CompositeError::NoParent(path.display().to_string()))?;
    std::fs::create_dir_all(dir)?;

    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        image.write_to(&mut writer, ImageFormat::Png)?;
    }
    tmp.persist(path).map_err(|e| CompositeError::Io(e.error))?;

    Ok(())
}

/// Build the comparison and write it to `path` on a blocking thread
pub async fn render_comparison(
    original: Array2<f32>,
    reconstructed: Array2<f32>,
    path: PathBuf,
) -> Result<(), CompositeError> {
    tokio::task::spawn_blocking(move || {
        let composite = side_by_side(original.view(), reconstructed.view());
        write_png_replacing(&composite, &path)
    })
    .await?
}

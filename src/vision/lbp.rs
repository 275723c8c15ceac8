// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Uniform local binary pattern texture descriptor
//!
//! Each pixel is compared against `P` neighbours sampled on a circle of
//! radius `R` (bilinear interpolation, zero outside the image). Patterns
//! with at most two bit transitions are coded by their number of set bits
//! (`0..=P`), every other pattern collapses into code `P + 1`. The
//! histogram over those `P + 2` codes is the feature vector fed to the SVM.

use image::GrayImage;
use ndarray::{Array2, ArrayView2};
use std::f64::consts::PI;
use thiserror::Error;

/// Added to the histogram denominator so an empty histogram stays finite
pub const HISTOGRAM_EPS: f64 = 1e-7;

#[derive(Debug, Error, PartialEq)]
pub enum LbpError {
    #[error("Image has no pixels ({rows}x{cols})")]
    EmptyImage { rows: usize, cols: usize },

    #[error("Number of sample points must be at least 1")]
    NoSamplePoints,

    #[error("Radius must be positive, got {0}")]
    InvalidRadius(f64),
}

/// Normalized LBP histogram of length `points + 2`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(bins: Vec<f64>) -> Self {
        Self(bins)
    }
}

/// Uniform LBP extractor with fixed sampling parameters
#[derive(Debug, Clone)]
pub struct LocalBinaryPatterns {
    num_points: usize,
    radius: f64,
    /// Row/column offset of every sample point, rounded to 5 decimals
    offsets: Vec<(f64, f64)>,
}

impl LocalBinaryPatterns {
    pub fn new(num_points: usize, radius: f64) -> Result<Self, LbpError> {
        if num_points == 0 {
            return Err(LbpError::NoSamplePoints);
        }
        if !(radius > 0.0) {
            return Err(LbpError::InvalidRadius(radius));
        }

        let offsets = (0..num_points)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / num_points as f64;
                (round5(-radius * angle.sin()), round5(radius * angle.cos()))
            })
            .collect();

        Ok(Self {
            num_points,
            radius,
            offsets,
        })
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of histogram bins produced by [`describe`](Self::describe)
    pub fn bins(&self) -> usize {
        self.num_points + 2
    }

    /// Describe an 8-bit grayscale image
    pub fn describe(&self, image: &GrayImage) -> Result<FeatureVector, LbpError> {
        let (width, height) = image.dimensions();
        let plane = Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
            image.get_pixel(c as u32, r as u32)[0] as f64
        });
        self.describe_array(plane.view())
    }

    /// Describe a 2D intensity array (rows x cols)
    pub fn describe_array(&self, image: ArrayView2<f64>) -> Result<FeatureVector, LbpError> {
        let (rows, cols) = image.dim();
        if rows == 0 || cols == 0 {
            return Err(LbpError::EmptyImage { rows, cols });
        }

        let codes = self.codes(image);

        let mut hist = vec![0.0f64; self.bins()];
        for code in codes.iter() {
            hist[*code] += 1.0;
        }

        let total: f64 = hist.iter().sum();
        for bin in &mut hist {
            *bin /= total + HISTOGRAM_EPS;
        }

        Ok(FeatureVector(hist))
    }

    /// Per-pixel uniform LBP codes in `0..=points + 1`
    pub fn codes(&self, image: ArrayView2<f64>) -> Array2<usize> {
        let (rows, cols) = image.dim();
        let p = self.num_points;
        let mut bits = vec![false; p];

        Array2::from_shape_fn((rows, cols), |(r, c)| {
            let centre = image[[r, c]];
            for (bit, (dr, dc)) in bits.iter_mut().zip(&self.offsets) {
                let neighbour = bilinear(&image, r as f64 + dr, c as f64 + dc);
                *bit = neighbour - centre >= 0.0;
            }

            let transitions = bits.windows(2).filter(|w| w[0] != w[1]).count();
            if transitions <= 2 {
                bits.iter().filter(|b| **b).count()
            } else {
                p + 1
            }
        })
    }
}

fn round5(value: f64) -> f64 {
    (value * 1e5).round() / 1e5
}

/// Bilinear sample; coordinates outside the image read as 0
fn bilinear(image: &ArrayView2<f64>, r: f64, c: f64) -> f64 {
    let min_r = r.floor();
    let min_c = c.floor();
    let max_r = r.ceil();
    let max_c = c.ceil();
    let dr = r - min_r;
    let dc = c - min_c;

    let top_left = pixel_or_zero(image, min_r, min_c);
    let top_right = pixel_or_zero(image, min_r, max_c);
    let bottom_left = pixel_or_zero(image, max_r, min_c);
    let bottom_right = pixel_or_zero(image, max_r, max_c);

    let top = (1.0 - dc) * top_left + dc * top_right;
    let bottom = (1.0 - dc) * bottom_left + dc * bottom_right;
    (1.0 - dr) * top + dr * bottom
}

fn pixel_or_zero(image: &ArrayView2<f64>, r: f64, c: f64) -> f64 {
    let (rows, cols) = image.dim();
    if r < 0.0 || c < 0.0 || r >= rows as f64 || c >= cols as f64 {
        0.0
    } else {
        image[[r as usize, c as usize]]
    }
}

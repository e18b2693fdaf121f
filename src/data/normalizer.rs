// ============================================================
// Layer 4 — Pixel Normaliser
// ============================================================
// MNIST ships raw intensities 0..=255 as f32. The network and
// its ReLU output layer work in [0, 1], so every pixel is
// divided by 255 and clamped.
//
// Flattening is row-major:
//   [[r0c0, r0c1, ...], [r1c0, ...], ...] → [r0c0, r0c1, ..., r1c0, ...]
//
// The inverse (to_byte) is used when drawing images to PNG.

use anyhow::Result;

use crate::domain::image::{GrayImage, IMAGE_HEIGHT, IMAGE_WIDTH};

/// Maximum raw MNIST intensity
pub const RAW_MAX: f32 = 255.0;

/// Converts raw MNIST pixel grids into normalised GrayImages.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    scale: f32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self { scale: RAW_MAX }
    }

    /// Normalise a single raw intensity into [0, 1]
    pub fn normalize_value(&self, raw: f32) -> f32 {
        (raw / self.scale).clamp(0.0, 1.0)
    }

    /// Flatten and normalise a raw 28×28 grid.
    pub fn normalize(
        &self,
        raw:   &[[f32; IMAGE_WIDTH]; IMAGE_HEIGHT],
        label: Option<u8>,
    ) -> Result<GrayImage> {
        let pixels: Vec<f32> = raw
            .iter()
            .flat_map(|row| row.iter().map(|&v| self.normalize_value(v)))
            .collect();
        GrayImage::new(pixels, label)
    }
}

/// Map a normalised intensity back to an 8-bit gray level.
pub fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * RAW_MAX).round() as u8
}

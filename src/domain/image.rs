// ============================================================
// Layer 3 — Image Domain Types
// ============================================================
// A GrayImage is one MNIST digit after normalisation:
//   28 rows × 28 columns, stored row-major as 784 f32 values
//   in the closed range [0, 1].
//
// A ReconstructionPair couples an original image with what the
// autoencoder produced for it, so the two can be compared
// numerically (MSE) and visually (side by side plot).
//
// The network's raw output is not bounded above, so the pair
// scores the raw output and keeps a clamped copy for plotting.
//
// Reference: Rust Book §5 (Structs and Methods)

use anyhow::{bail, Result};

/// Image height in pixels
pub const IMAGE_HEIGHT: usize = 28;

/// Image width in pixels
pub const IMAGE_WIDTH: usize = 28;

/// Length of a flattened image vector (the network's input width)
pub const IMAGE_PIXELS: usize = IMAGE_HEIGHT * IMAGE_WIDTH;

/// A normalised grayscale image.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    /// Row-major pixel intensities in [0, 1]
    pixels: Vec<f32>,

    /// The digit shown, when known
    pub label: Option<u8>,
}

impl GrayImage {
    /// Build an image from a flattened pixel vector.
    ///
    /// The vector must hold exactly IMAGE_PIXELS values.
    /// Values outside [0, 1] are clamped, NaN becomes 0.
    pub fn new(pixels: Vec<f32>, label: Option<u8>) -> Result<Self> {
        check_len(pixels.len())?;
        let pixels = pixels.into_iter().map(clamp_unit).collect();
        Ok(Self { pixels, label })
    }

    /// An all-black image
    #[cfg(test)]
    pub fn blank() -> Self {
        Self { pixels: vec![0.0; IMAGE_PIXELS], label: None }
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Intensity at (row, col)
    pub fn pixel(&self, row: usize, col: usize) -> f32 {
        self.pixels[row * IMAGE_WIDTH + col]
    }
}

fn check_len(len: usize) -> Result<()> {
    if len != IMAGE_PIXELS {
        bail!(
            "Expected {} pixels ({}x{}), got {}",
            IMAGE_PIXELS,
            IMAGE_HEIGHT,
            IMAGE_WIDTH,
            len
        );
    }
    Ok(())
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Element-wise MSE of two equally long slices. Empty input gives 0.
pub fn mean_squared_error(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }
    let sum: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    sum / a.len() as f32
}

// ─── ReconstructionPair ───────────────────────────────────────────────────────
/// An input image and the network's reconstruction of it.
#[derive(Debug, Clone)]
pub struct ReconstructionPair {
    pub original:      GrayImage,
    /// Network output clamped into [0, 1] for display
    pub reconstructed: GrayImage,
    mse:               f32,
}

impl ReconstructionPair {
    /// Pair an image with the raw network output for it.
    ///
    /// The MSE is taken on `raw_output` as produced, before any clamping.
    pub fn new(original: GrayImage, raw_output: Vec<f32>) -> Result<Self> {
        check_len(raw_output.len())?;
        let mse = mean_squared_error(original.pixels(), &raw_output);
        let reconstructed = GrayImage::new(raw_output, original.label)?;
        Ok(Self { original, reconstructed, mse })
    }

    /// Reconstruction loss for this single image
    pub fn mse(&self) -> f32 {
        self.mse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_length() {
        assert!(GrayImage::new(vec![0.0; 10], None).is_err());
        assert!(GrayImage::new(vec![0.0; IMAGE_PIXELS + 1], None).is_err());
        assert!(ReconstructionPair::new(GrayImage::blank(), vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_clamps_out_of_range_values() {
        let mut px = vec![0.5; IMAGE_PIXELS];
        px[0] = -3.0;
        px[1] = 7.0;
        px[2] = f32::NAN;
        let img = GrayImage::new(px, Some(3)).unwrap();
        assert_eq!(img.pixels()[0], 0.0);
        assert_eq!(img.pixels()[1], 1.0);
        assert_eq!(img.pixels()[2], 0.0);
        assert_eq!(img.label, Some(3));
    }

    #[test]
    fn test_pixel_is_row_major() {
        let px: Vec<f32> = (0..IMAGE_PIXELS).map(|i| i as f32 / IMAGE_PIXELS as f32).collect();
        let img = GrayImage::new(px.clone(), None).unwrap();
        assert_eq!(img.pixel(1, 0), px[IMAGE_WIDTH]);
        assert_eq!(img.pixel(2, 5), px[2 * IMAGE_WIDTH + 5]);
    }

    #[test]
    fn test_pair_mse() {
        let white = GrayImage::new(vec![1.0; IMAGE_PIXELS], Some(8)).unwrap();
        let pair  = ReconstructionPair::new(white, vec![0.0; IMAGE_PIXELS]).unwrap();
        assert!((pair.mse() - 1.0).abs() < 1e-6);
        assert_eq!(pair.reconstructed.label, Some(8));
    }

    #[test]
    fn test_pair_mse_uses_unclamped_output() {
        let grey = GrayImage::new(vec![0.5; IMAGE_PIXELS], None).unwrap();
        let pair = ReconstructionPair::new(grey, vec![2.5; IMAGE_PIXELS]).unwrap();

        // (2.5 - 0.5)^2, not (1.0 - 0.5)^2 from the clamped copy
        assert!((pair.mse() - 4.0).abs() < 1e-6);
        assert_eq!(pair.reconstructed.pixel(0, 0), 1.0);
    }
}

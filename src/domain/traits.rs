// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer asks for images through ImageSource and
// never needs to know whether they came from the MNIST download,
// a test fixture, or some other dataset.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::image::GrayImage;

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Any component that can produce normalised images.
///
/// Implementations:
///   - MnistLoader → MNIST train or test split via Burn's dataset utility
///   - Vec<GrayImage> → in-memory images (tests, pre-loaded data)
pub trait ImageSource {
    /// Load all available images from this source.
    fn load_all(&self) -> Result<Vec<GrayImage>>;
}

impl ImageSource for Vec<GrayImage> {
    fn load_all(&self) -> Result<Vec<GrayImage>> {
        Ok(self.clone())
    }
}

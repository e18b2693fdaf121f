// ============================================================
// Layer 4 — MNIST Loader
// ============================================================
// Loads MNIST through Burn's dataset utility.
//
// MnistDataset::train() / ::test() download the IDX archives on
// first use and cache them under the user's cache directory.
// Each item is an MnistItem { image: [[f32; 28]; 28], label: u8 }
// with raw intensities 0..=255, which we hand to the Normalizer.
//
// Reference: Burn Book §4 (Datasets)

use anyhow::Result;
use burn::data::dataset::{
    vision::{MnistDataset, MnistItem},
    Dataset,
};

use crate::data::normalizer::Normalizer;
use crate::domain::image::GrayImage;
use crate::domain::traits::ImageSource;

/// Which half of MNIST to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnistSplit {
    /// 60 000 training images
    Train,
    /// 10 000 test images
    Test,
}

/// Loads (a window of) an MNIST split as normalised images.
pub struct MnistLoader {
    split:  MnistSplit,
    offset: usize,
    limit:  Option<usize>,
}

impl MnistLoader {
    pub fn new(split: MnistSplit) -> Self {
        Self { split, offset: 0, limit: None }
    }

    /// Skip the first `offset` images
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Load at most `limit` images
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    fn open(&self) -> MnistDataset {
        match self.split {
            MnistSplit::Train => MnistDataset::train(),
            MnistSplit::Test  => MnistDataset::test(),
        }
    }
}

impl ImageSource for MnistLoader {
    fn load_all(&self) -> Result<Vec<GrayImage>> {
        tracing::info!("Opening MNIST {:?} split", self.split);
        let dataset = self.open();
        tracing::debug!("MNIST {:?} split holds {} images", self.split, dataset.len());

        let end = window_end(self.offset, self.limit, dataset.len());
        let items = (self.offset..end).filter_map(|i| dataset.get(i));
        let images = normalize_items(items)?;

        tracing::info!("Loaded {} MNIST images", images.len());
        Ok(images)
    }
}

/// Exclusive end index of the `offset`/`limit` window over `len` items.
fn window_end(offset: usize, limit: Option<usize>, len: usize) -> usize {
    match limit {
        Some(limit) => offset.saturating_add(limit).min(len),
        None        => len,
    }
}

/// Normalise raw MNIST items into GrayImages, keeping their labels.
pub fn normalize_items(items: impl Iterator<Item = MnistItem>) -> Result<Vec<GrayImage>> {
    let normalizer = Normalizer::new();
    items
        .map(|item| normalizer.normalize(&item.image, Some(item.label)))
        .collect()
}

use burn::data::dataset::Dataset;

use crate::domain::image::GrayImage;

/// In-memory image dataset fed to Burn's DataLoader.
pub struct ImageDataset {
    images: Vec<GrayImage>,
}

impl ImageDataset {
    pub fn new(images: Vec<GrayImage>) -> Self { Self { images } }

    pub fn image_count(&self) -> usize { self.images.len() }

    pub fn first(&self) -> Option<&GrayImage> { self.images.first() }
}

impl Dataset<GrayImage> for ImageDataset {
    fn get(&self, index: usize) -> Option<GrayImage> {
        self.images.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.images.len()
    }
}

// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<GrayImage>
// into one float tensor.
//
//   Input:  N GrayImages, each 784 values
//   Output: ImageBatch with images of shape [N, 784]
//
// The autoencoder's target is its own input, so a batch holds
// nothing but the images.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::image::{GrayImage, IMAGE_PIXELS};

/// A batch of flattened images — shape: [batch_size, 784]
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    pub images: Tensor<B, 2>,
}

/// Holds the target device so tensors are created on the
/// correct CPU/GPU.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<GrayImage, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<GrayImage>) -> ImageBatch<B> {
        ImageBatch { images: images_to_tensor(&items, &self.device) }
    }
}

/// Flatten images into a single [N, 784] tensor on `device`.
///
/// Shared by the batcher and by inference so both see exactly
/// the same layout.
pub fn images_to_tensor<B: Backend>(images: &[GrayImage], device: &B::Device) -> Tensor<B, 2> {
    let flat: Vec<f32> = images
        .iter()
        .flat_map(|img| img.pixels().iter().copied())
        .collect();

    Tensor::<B, 1>::from_floats(flat.as_slice(), device)
        .reshape([images.len(), IMAGE_PIXELS])
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shape() {
        let device  = Default::default();
        let batcher = ImageBatcher::<TestBackend>::new(device);
        let items   = vec![GrayImage::blank(); 5];

        let batch = batcher.batch(items);
        assert_eq!(batch.images.dims(), [5, IMAGE_PIXELS]);
    }

    #[test]
    fn test_rows_follow_item_order() {
        let device = Default::default();
        let bright = GrayImage::new(vec![1.0; IMAGE_PIXELS], None).unwrap();
        let images = vec![GrayImage::blank(), bright];

        let tensor = images_to_tensor::<TestBackend>(&images, &device);
        let values = tensor.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[IMAGE_PIXELS], 1.0);
        assert_eq!(values.len(), 2 * IMAGE_PIXELS);
    }
}

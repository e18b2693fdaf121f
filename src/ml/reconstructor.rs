// ============================================================
// Layer 5 — Reconstructor
// ============================================================
// Inference side of the autoencoder: loads a checkpoint, pushes
// images through the network and hands back reconstructions or
// latent codes as plain domain values.
//
// Runs on a plain (non-autodiff) backend.

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::data::batcher::images_to_tensor;
use crate::domain::image::{GrayImage, ReconstructionPair, IMAGE_PIXELS};
use crate::infra::checkpoint::{CheckpointManager, CheckpointSelector};
use crate::ml::model::{Autoencoder, AutoencoderConfig};

pub struct Reconstructor<B: Backend> {
    model:  Autoencoder<B>,
    device: B::Device,
}

impl<B: Backend> Reconstructor<B> {
    pub fn new(model: Autoencoder<B>, device: B::Device) -> Self {
        Self { model, device }
    }

    /// Rebuild the model from the saved config and load weights into it.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        selector:     CheckpointSelector,
        device:       B::Device,
    ) -> Result<Self> {
        let cfg   = ckpt_manager.load_config()?;
        let model = AutoencoderConfig::mnist(cfg.hidden_dim, cfg.latent_dim).init::<B>(&device);
        let model = ckpt_manager.load_model(model, selector, &device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self::new(model, device))
    }

    /// Run the full autoencoder on each image.
    pub fn reconstruct(&self, images: &[GrayImage]) -> Result<Vec<ReconstructionPair>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let input  = images_to_tensor::<B>(images, &self.device);
        let output = tensor_to_vec(self.model.forward(input))?;

        output
            .chunks(IMAGE_PIXELS)
            .zip(images)
            .map(|(raw, original)| ReconstructionPair::new(original.clone(), raw.to_vec()))
            .collect()
    }

    /// Latent code for each image, `latent_dim` values apiece.
    pub fn encode(&self, images: &[GrayImage]) -> Result<Vec<Vec<f32>>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let input  = images_to_tensor::<B>(images, &self.device);
        let latent = self.model.encode(input);
        let [_, latent_dim] = latent.dims();
        let flat = tensor_to_vec(latent)?;

        Ok(flat.chunks(latent_dim).map(<[f32]>::to_vec).collect())
    }
}

fn tensor_to_vec<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read tensor data: {e:?}"))
}

// ─── Latent statistics ────────────────────────────────────────────────────────
/// Summary of a batch of latent codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatentStats {
    /// Mean activation over every latent unit of every image
    pub mean_activation: f32,
    /// Share of latent units that ReLU switched off (exactly 0)
    pub zero_fraction:   f32,
}

pub fn latent_stats(latents: &[Vec<f32>]) -> LatentStats {
    let values: Vec<f32> = latents.iter().flatten().copied().collect();
    if values.is_empty() {
        return LatentStats { mean_activation: 0.0, zero_fraction: 0.0 };
    }
    let n     = values.len() as f32;
    let zeros = values.iter().filter(|&&v| v == 0.0).count() as f32;
    LatentStats {
        mean_activation: values.iter().sum::<f32>() / n,
        zero_fraction:   zeros / n,
    }
}

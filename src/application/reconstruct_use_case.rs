// ============================================================
// Layer 2 — Reconstruct Use Case
// ============================================================
// Loads the best checkpoint, reconstructs a window of MNIST
// test images and writes them next to their originals.
//
//   1. Read train_config.json + best_epoch.json   (Layer 6)
//   2. Load `count` test images from `offset`     (Layer 4)
//   3. Reconstruct and encode them                (Layer 5)
//   4. Plot original | reconstruction rows        (Layer 6)

use anyhow::{bail, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    prelude::Backend,
};
use std::path::PathBuf;

use crate::data::loader::{MnistLoader, MnistSplit};
use crate::domain::compute::BackendKind;
use crate::domain::traits::ImageSource;
use crate::infra::{
    checkpoint::{CheckpointManager, CheckpointSelector},
    plotter::ComparisonPlot,
};
use crate::ml::reconstructor::{latent_stats, LatentStats, Reconstructor};

#[derive(Debug, Clone)]
pub struct ReconstructConfig {
    pub checkpoint_dir: String,
    pub count:          usize,
    pub offset:         usize,
    pub output:         PathBuf,
    pub backend:        BackendKind,
}

/// Numbers reported back to the user.
#[derive(Debug, Clone)]
pub struct ReconstructSummary {
    pub epoch:     usize,
    pub mse:       Vec<f32>,
    pub mean_mse:  f32,
    pub latent:    LatentStats,
    pub output:    PathBuf,
}

pub struct ReconstructUseCase {
    config: ReconstructConfig,
}

impl ReconstructUseCase {
    pub fn new(config: ReconstructConfig) -> Self {
        Self { config }
    }

    /// Reconstruct images from the MNIST test split
    pub fn execute(&self) -> Result<ReconstructSummary> {
        let loader = MnistLoader::new(MnistSplit::Test)
            .with_offset(self.config.offset)
            .with_limit(Some(self.config.count));
        self.execute_with(&loader)
    }

    pub fn execute_with<S: ImageSource>(&self, source: &S) -> Result<ReconstructSummary> {
        if self.config.count == 0 {
            bail!("count must be at least 1");
        }
        match self.config.backend {
            BackendKind::NdArray => self.run::<NdArray, S>(source, NdArrayDevice::default()),
            BackendKind::Wgpu    => self.run::<Wgpu, S>(source, WgpuDevice::default()),
        }
    }

    fn run<B: Backend, S: ImageSource>(
        &self,
        source: &S,
        device: B::Device,
    ) -> Result<ReconstructSummary> {
        let cfg  = &self.config;
        let ckpt = CheckpointManager::open(&cfg.checkpoint_dir)?;
        let epoch = ckpt.resolve(CheckpointSelector::Best)?;
        let reconstructor =
            Reconstructor::<B>::from_checkpoint(&ckpt, CheckpointSelector::Epoch(epoch), device)?;

        let mut images = source.load_all()?;
        images.truncate(cfg.count);
        if images.is_empty() {
            bail!("No images to reconstruct");
        }

        let pairs  = reconstructor.reconstruct(&images)?;
        let latent = latent_stats(&reconstructor.encode(&images)?);

        let mse: Vec<f32> = pairs.iter().map(|p| p.mse()).collect();
        let mean_mse = mse.iter().sum::<f32>() / mse.len() as f32;
        for (i, (pair, err)) in pairs.iter().zip(&mse).enumerate() {
            tracing::debug!("Image {} (label {:?}): mse={:.6}", i, pair.original.label, err);
        }
        tracing::info!(
            "Mean reconstruction MSE {:.6}; latent mean {:.4}, {:.1}% inactive",
            mean_mse,
            latent.mean_activation,
            latent.zero_fraction * 100.0,
        );

        ComparisonPlot::default().save(&pairs, &cfg.output)?;

        Ok(ReconstructSummary { epoch, mse, mean_mse, latent, output: cfg.output.clone() })
    }
}

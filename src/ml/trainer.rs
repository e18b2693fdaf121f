// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
//   - Training runs on Autodiff<Backend> so gradients are tracked
//   - model.valid() returns the model on the inner backend,
//     used for the validation pass without autodiff bookkeeping
//   - The validation batcher must therefore use the inner backend
//
// Loss is the mean squared error between the reconstruction
// and the input image itself; there are no labels involved.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    backend::{
        ndarray::NdArrayDevice,
        wgpu::WgpuDevice,
        Autodiff, NdArray, Wgpu,
    },
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ImageBatcher, dataset::ImageDataset};
use crate::domain::compute::BackendKind;
use crate::domain::image::ReconstructionPair;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{Autoencoder, AutoencoderConfig};
use crate::ml::reconstructor::Reconstructor;

type CpuTrainBackend = Autodiff<NdArray>;
type GpuTrainBackend = Autodiff<Wgpu>;

/// What a finished training run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// One entry per epoch, in order
    pub history:    Vec<EpochMetrics>,
    /// Epoch with the lowest validation (or training) loss
    pub best_epoch: usize,
    /// Reconstruction of the first held-out image
    pub sample:     Option<ReconstructionPair>,
}

impl TrainingReport {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.history.last()
    }
}

/// Train on the backend named in the config.
pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<TrainingReport> {
    match cfg.backend {
        BackendKind::NdArray => {
            let device = NdArrayDevice::default();
            tracing::info!("Using NdArray device: {:?}", device);
            train_loop::<CpuTrainBackend>(cfg, train_dataset, val_dataset, ckpt_manager, metrics, device)
        }
        BackendKind::Wgpu => {
            let device = WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            train_loop::<GpuTrainBackend>(cfg, train_dataset, val_dataset, ckpt_manager, metrics, device)
        }
    }
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<TrainingReport> {
    if train_dataset.image_count() == 0 {
        bail!("Training set is empty; nothing to train on");
    }

    B::seed(cfg.seed);
    ckpt_manager.clear_best()?;

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = AutoencoderConfig::mnist(cfg.hidden_dim, cfg.latent_dim);
    let mut model: Autoencoder<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {}→{}→{}→{}→{}",
        model_cfg.input_dim, model_cfg.hidden_dim, model_cfg.latent_dim,
        model_cfg.hidden_dim, model_cfg.input_dim,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().init::<B, Autoencoder<B>>();

    // Picked before the datasets are moved into their loaders
    let sample_image = val_dataset
        .first()
        .or_else(|| train_dataset.first())
        .cloned();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(ImageBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(cfg.num_workers)
        .build(train_dataset);

    let val_loader = DataLoaderBuilder::new(ImageBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(cfg.num_workers)
        .build(val_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut history    = Vec::with_capacity(cfg.epochs);
    let mut best_loss  = f64::INFINITY;
    let mut best_epoch = 0usize;

    for epoch in 1..=cfg.epochs {
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.images);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let model_valid = model.valid();
        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;

        for batch in val_loader.iter() {
            let (loss, _) = model_valid.forward_loss(batch.images);
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;
        }

        let row = EpochMetrics::new(
            epoch,
            average(train_loss_sum, train_batches),
            average(val_loss_sum, val_batches),
        );

        println!(
            "Epoch {:>3}/{} | train_loss={:.6} | val_loss={:.6}",
            epoch, cfg.epochs, row.train_loss, row.val_loss,
        );

        metrics.log(&row)?;
        ckpt_manager.save_model(&model_valid, epoch)?;
        if row.is_improvement(best_loss) {
            best_loss  = row.selection_loss();
            best_epoch = epoch;
            ckpt_manager.mark_best(epoch)?;
            tracing::debug!("New best epoch {} (loss {:.6})", epoch, best_loss);
        }
        history.push(row);
    }

    if best_epoch == 0 {
        // Every loss was non-finite; fall back to the last epoch written
        best_epoch = cfg.epochs;
        ckpt_manager.mark_best(best_epoch)?;
        tracing::warn!("No finite loss observed; best epoch defaults to {}", best_epoch);
    }

    let sample = match sample_image {
        Some(image) => Reconstructor::new(model.valid(), device)
            .reconstruct(std::slice::from_ref(&image))?
            .pop(),
        None => None,
    };

    tracing::info!("Training complete! Best epoch: {}", best_epoch);
    Ok(TrainingReport { history, best_epoch, sample })
}

fn average(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { f64::NAN }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::{GrayImage, IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH};
    use crate::infra::checkpoint::CheckpointSelector;

    /// Digit-like strokes: each image lights up one row band and one column band.
    fn synthetic_images(count: usize) -> Vec<GrayImage> {
        (0..count)
            .map(|k| {
                let band_row = (k * 5) % (IMAGE_HEIGHT - 4);
                let band_col = (k * 7) % (IMAGE_WIDTH - 4);
                let mut px = vec![0.0f32; IMAGE_PIXELS];
                for r in 0..IMAGE_HEIGHT {
                    for c in 0..IMAGE_WIDTH {
                        let on = (band_row..band_row + 4).contains(&r)
                              || (band_col..band_col + 4).contains(&c);
                        if on {
                            px[r * IMAGE_WIDTH + c] = 1.0;
                        }
                    }
                }
                GrayImage::new(px, Some((k % 10) as u8)).unwrap()
            })
            .collect()
    }

    fn small_config(dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            checkpoint_dir: dir.to_string_lossy().into_owned(),
            batch_size:     8,
            epochs:         10,
            lr:             3e-3,
            hidden_dim:     32,
            latent_dim:     16,
            num_workers:    1,
            seed:           7,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_training_lowers_loss_and_writes_checkpoints() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = small_config(dir.path());
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        let report = train_loop::<CpuTrainBackend>(
            &cfg,
            ImageDataset::new(synthetic_images(48)),
            ImageDataset::new(synthetic_images(16)),
            &ckpt,
            &metrics,
            NdArrayDevice::default(),
        )
        .unwrap();

        assert_eq!(report.history.len(), cfg.epochs);
        let first = report.history.first().unwrap().train_loss;
        let last  = report.final_metrics().unwrap().train_loss;
        assert!(last < first, "loss did not fall: {first} -> {last}");
        assert!(report.history.iter().all(|m| m.val_loss.is_finite()));

        assert!((1..=cfg.epochs).contains(&report.best_epoch));
        assert_eq!(ckpt.latest_epoch().unwrap(), cfg.epochs);
        assert_eq!(ckpt.resolve(CheckpointSelector::Best).unwrap(), report.best_epoch);
        assert!(dir.path().join(format!("model_epoch_{}.mpk.gz", cfg.epochs)).exists());

        let sample = report.sample.unwrap();
        assert_eq!(sample.reconstructed.pixels().len(), IMAGE_PIXELS);
    }

    #[test]
    fn test_without_holdout_val_loss_is_nan() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = TrainConfig { epochs: 2, ..small_config(dir.path()) };
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        let report = train_loop::<CpuTrainBackend>(
            &cfg,
            ImageDataset::new(synthetic_images(8)),
            ImageDataset::new(Vec::new()),
            &ckpt,
            &metrics,
            NdArrayDevice::default(),
        )
        .unwrap();

        assert!(report.history.iter().all(|m| m.val_loss.is_nan()));
        assert!(report.sample.is_some());
    }

    #[test]
    fn test_non_finite_run_replaces_stale_best_pointer() {
        let dir     = tempfile::tempdir().unwrap();
        // A NaN step size turns every weight, and so every loss, into NaN
        let cfg     = TrainConfig { epochs: 2, lr: f64::NAN, ..small_config(dir.path()) };
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        // Left behind by an earlier, longer run in the same directory
        ckpt.mark_best(9).unwrap();

        let report = train_loop::<CpuTrainBackend>(
            &cfg,
            ImageDataset::new(synthetic_images(48)),
            ImageDataset::new(synthetic_images(8)),
            &ckpt,
            &metrics,
            NdArrayDevice::default(),
        )
        .unwrap();

        assert!(report.history.iter().skip(1).all(|m| !m.train_loss.is_finite()));
        assert_eq!(report.best_epoch, cfg.epochs);
        assert_eq!(ckpt.resolve(CheckpointSelector::Best).unwrap(), cfg.epochs);
    }

    #[test]
    fn test_empty_training_set_is_an_error() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = small_config(dir.path());
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        let result = train_loop::<CpuTrainBackend>(
            &cfg,
            ImageDataset::new(Vec::new()),
            ImageDataset::new(synthetic_images(4)),
            &ckpt,
            &metrics,
            NdArrayDevice::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_average() {
        assert_eq!(average(3.0, 2), 1.5);
        assert!(average(1.0, 0).is_nan());
    }
}

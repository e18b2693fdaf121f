// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate the configuration
//   Step 2: Load MNIST training images   (Layer 4 - data)
//   Step 3: Split train/validation       (Layer 4 - data)
//   Step 4: Build datasets               (Layer 4 - data)
//   Step 5: Save config                  (Layer 6 - infra)
//   Step 6: Run training loop            (Layer 5 - ml)
//   Step 7: Plot reconstruction + loss   (Layer 6 - infra)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{
    dataset::ImageDataset,
    loader::{MnistLoader, MnistSplit},
    splitter::split_train_val,
};
use crate::domain::compute::BackendKind;
use crate::domain::traits::ImageSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    plotter::{save_loss_curve, ComparisonPlot},
};
use crate::ml::trainer::{run_training, TrainingReport};

pub const SAMPLE_PLOT_FILE: &str = "sample_reconstruction.png";
pub const LOSS_PLOT_FILE:   &str = "loss_curve.png";

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved next to the checkpoints so inference can rebuild the
// same layer widths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub checkpoint_dir: String,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub hidden_dim:     usize,
    pub latent_dim:     usize,
    pub val_fraction:   f64,
    pub limit:          Option<usize>,
    pub seed:           u64,
    pub num_workers:    usize,
    pub backend:        BackendKind,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: "checkpoints".to_string(),
            batch_size:     64,
            epochs:         10,
            lr:             1e-3,
            hidden_dim:     128,
            latent_dim:     128,
            val_fraction:   0.1,
            limit:          None,
            seed:           42,
            num_workers:    2,
            backend:        BackendKind::NdArray,
        }
    }
}

impl TrainConfig {
    /// Reject settings that would make training meaningless or panic.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            bail!("lr must be a positive number, got {}", self.lr);
        }
        if self.hidden_dim == 0 || self.latent_dim == 0 {
            bail!("hidden_dim and latent_dim must be at least 1");
        }
        if !(0.0..1.0).contains(&self.val_fraction) {
            bail!("val_fraction must be in [0, 1), got {}", self.val_fraction);
        }
        if self.num_workers == 0 {
            bail!("num_workers must be at least 1");
        }
        Ok(())
    }

    pub fn checkpoint_path(&self) -> &Path {
        Path::new(&self.checkpoint_dir)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

/// Where the run left its artefacts.
#[derive(Debug)]
pub struct TrainOutcome {
    pub report:      TrainingReport,
    pub metrics_csv: PathBuf,
    pub sample_plot: Option<PathBuf>,
    pub loss_plot:   Option<PathBuf>,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train on the MNIST training split
    pub fn execute(&self) -> Result<TrainOutcome> {
        let loader = MnistLoader::new(MnistSplit::Train).with_limit(self.config.limit);
        self.execute_with(&loader)
    }

    /// Train on images from any source.
    pub fn execute_with<S: ImageSource>(&self, source: &S) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Load images ───────────────────────────────────────────────
        let mut images = source.load_all()?;
        if let Some(limit) = cfg.limit {
            images.truncate(limit);
        }
        tracing::info!("Loaded {} images", images.len());

        // ── Step 3: Train / validation split ──────────────────────────────────
        let (train_images, val_images) =
            split_train_val(images, 1.0 - cfg.val_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_images.len(),
            val_images.len()
        );

        // ── Step 4: Build Burn datasets ───────────────────────────────────────
        let train_dataset = ImageDataset::new(train_images);
        let val_dataset   = ImageDataset::new(val_images);

        // ── Step 5: Save config for inference ─────────────────────────────────
        let ckpt_manager = CheckpointManager::new(cfg.checkpoint_path())?;
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(cfg.checkpoint_path())?;

        // ── Step 6: Run training loop (Layer 5) ───────────────────────────────
        let report = run_training(cfg, train_dataset, val_dataset, &ckpt_manager, &metrics)?;

        // ── Step 7: Plots ─────────────────────────────────────────────────────
        // A failed plot should not throw away a finished training run.
        let sample_plot = report.sample.as_ref().and_then(|pair| {
            let path = ckpt_manager.dir().join(SAMPLE_PLOT_FILE);
            match ComparisonPlot::default().save(std::slice::from_ref(pair), &path) {
                Ok(())  => Some(path),
                Err(e)  => { tracing::warn!("Could not plot sample: {e:#}"); None }
            }
        });

        let loss_path = ckpt_manager.dir().join(LOSS_PLOT_FILE);
        let loss_plot = match save_loss_curve(&report.history, &loss_path) {
            Ok(())  => Some(loss_path),
            Err(e)  => { tracing::warn!("Could not plot loss curve: {e:#}"); None }
        };

        let metrics_csv = metrics.csv_path().to_path_buf();
        Ok(TrainOutcome { report, metrics_csv, sample_plot, loss_plot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::{GrayImage, IMAGE_PIXELS};

    #[test]
    fn test_default_config_is_valid() {
        let cfg = TrainConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!((cfg.hidden_dim, cfg.latent_dim), (128, 128));
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let base = TrainConfig::default();
        assert!(TrainConfig { batch_size: 0, ..base.clone() }.validate().is_err());
        assert!(TrainConfig { epochs: 0, ..base.clone() }.validate().is_err());
        assert!(TrainConfig { lr: 0.0, ..base.clone() }.validate().is_err());
        assert!(TrainConfig { lr: f64::NAN, ..base.clone() }.validate().is_err());
        assert!(TrainConfig { val_fraction: 1.0, ..base.clone() }.validate().is_err());
        assert!(TrainConfig { num_workers: 0, ..base }.validate().is_err());
    }

    #[test]
    fn test_execute_writes_artefacts() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            checkpoint_dir: dir.path().to_string_lossy().into_owned(),
            batch_size:     4,
            epochs:         2,
            hidden_dim:     16,
            latent_dim:     8,
            val_fraction:   0.25,
            limit:          Some(12),
            num_workers:    1,
            ..TrainConfig::default()
        };
        let images: Vec<GrayImage> = (0..20)
            .map(|i| GrayImage::new(vec![i as f32 / 20.0; IMAGE_PIXELS], None).unwrap())
            .collect();

        let outcome = TrainUseCase::new(cfg).execute_with(&images).unwrap();

        assert_eq!(outcome.report.history.len(), 2);
        assert!(dir.path().join("train_config.json").exists());
        assert_eq!(outcome.metrics_csv, dir.path().join("metrics.csv"));
        let csv = std::fs::read_to_string(&outcome.metrics_csv).unwrap();
        assert_eq!(csv.lines().count(), 1 + 2);
        assert_eq!(outcome.sample_plot, Some(dir.path().join(SAMPLE_PLOT_FILE)));
        assert_eq!(outcome.loss_plot, Some(dir.path().join(LOSS_PLOT_FILE)));
        assert!(dir.path().join(LOSS_PLOT_FILE).exists());
    }
}

// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores autoencoder weights using Burn's named
// MessagePack recorder with gzip compression and half-precision
// floats.
//
// What gets saved:
//   1. Model weights (.mpk.gz file) — one per epoch
//   2. latest_epoch.json            — last epoch written
//   3. best_epoch.json              — epoch with lowest validation loss
//   4. train_config.json            — hyperparameters / layer widths
//
// The config is needed at inference time to rebuild a model
// with the same layer widths before loading weights into it.
//
// NamedMpkGzFileRecorder<HalfPrecisionSettings>:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip
//   - Stores floats as f16
//   - Fails to load if the architecture doesn't match
//
// File layout:
//   checkpoints/
//     model_epoch_1.mpk.gz
//     model_epoch_2.mpk.gz
//     ...
//     latest_epoch.json
//     best_epoch.json
//     train_config.json
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{HalfPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Autoencoder;

const LATEST_EPOCH_FILE: &str = "latest_epoch.json";
const BEST_EPOCH_FILE:   &str = "best_epoch.json";
const CONFIG_FILE:       &str = "train_config.json";

/// Extension the recorder appends to every weights file
pub const MODEL_EXTENSION: &str = "mpk.gz";

type CheckpointRecorder = NamedMpkGzFileRecorder<HalfPrecisionSettings>;

/// Which saved epoch to restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointSelector {
    /// Falls back to the latest epoch when no best pointer exists
    Best,
    Epoch(usize),
}

/// Manages saving and loading of model checkpoints in one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager for writing, creating the
    /// directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open an existing checkpoint directory for reading.
    /// Never creates anything on disk.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            bail!(
                "Checkpoint dir '{}' does not exist. Have you run 'train' first?",
                dir.display()
            );
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the weights file for `epoch`, extension included
    pub fn model_file(&self, epoch: usize) -> PathBuf {
        self.model_path(epoch).with_extension(MODEL_EXTENSION)
    }

    /// Save model weights for a given epoch and move the latest pointer.
    pub fn save_model<B: Backend>(&self, model: &Autoencoder<B>, epoch: usize) -> Result<()> {
        let path = self.model_path(epoch);

        CheckpointRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        self.write_pointer(LATEST_EPOCH_FILE, epoch)?;
        tracing::debug!("Saved checkpoint: '{}'", self.model_file(epoch).display());
        Ok(())
    }

    /// Record `epoch` as the best one seen so far
    pub fn mark_best(&self, epoch: usize) -> Result<()> {
        self.write_pointer(BEST_EPOCH_FILE, epoch)
    }

    /// Drop the best-epoch pointer left by an earlier run, if any.
    pub fn clear_best(&self) -> Result<()> {
        let path = self.dir.join(BEST_EPOCH_FILE);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Cannot remove stale '{}'", path.display()))?;
            tracing::debug!("Removed stale best-epoch pointer");
        }
        Ok(())
    }

    /// Load weights from a saved epoch into `model`.
    ///
    /// The model must have the same layer widths as the one
    /// that was saved.
    pub fn load_model<B: Backend>(
        &self,
        model:    Autoencoder<B>,
        selector: CheckpointSelector,
        device:   &B::Device,
    ) -> Result<Autoencoder<B>> {
        let epoch = self.resolve(selector)?;
        let path  = self.model_path(epoch);

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CheckpointRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'reconstruct'.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }

    /// Epoch number a selector refers to
    pub fn resolve(&self, selector: CheckpointSelector) -> Result<usize> {
        match selector {
            CheckpointSelector::Epoch(epoch) => Ok(epoch),
            CheckpointSelector::Best => {
                if self.dir.join(BEST_EPOCH_FILE).exists() {
                    self.read_pointer(BEST_EPOCH_FILE)
                } else {
                    self.latest_epoch()
                }
            }
        }
    }

    /// Last epoch written by save_model
    pub fn latest_epoch(&self) -> Result<usize> {
        self.read_pointer(LATEST_EPOCH_FILE)
    }

    fn model_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("model_epoch_{epoch}"))
    }

    fn write_pointer(&self, file: &str, epoch: usize) -> Result<()> {
        let path = self.dir.join(file);
        fs::write(&path, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", path.display()))
    }

    fn read_pointer(&self, file: &str) -> Result<usize> {
        let path = self.dir.join(file);
        let s = fs::read_to_string(&path)
            .with_context(|| {
                format!("Cannot find '{}'. Have you run 'train' first?", path.display())
            })?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

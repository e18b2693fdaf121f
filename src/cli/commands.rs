// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `reconstruct`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::reconstruct_use_case::ReconstructConfig;
use crate::application::train_use_case::TrainConfig;
use crate::domain::compute::BackendKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the autoencoder on the MNIST training split
    Train(TrainArgs),

    /// Reconstruct MNIST test images with a trained checkpoint
    Reconstruct(ReconstructArgs),
}

/// Compute backend as offered on the command line
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum BackendArg {
    /// CPU (pure Rust)
    #[default]
    Ndarray,
    /// GPU via WebGPU
    Wgpu,
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Ndarray => BackendKind::NdArray,
            BackendArg::Wgpu    => BackendKind::Wgpu,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory to save checkpoints, metrics and plots
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of images processed together in one forward pass
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Width of the hidden layer on both sides of the bottleneck
    #[arg(long, default_value_t = 128)]
    pub hidden_dim: usize,

    /// Width of the latent code
    #[arg(long, default_value_t = 128)]
    pub latent_dim: usize,

    /// Share of the training split held out for validation
    #[arg(long, default_value_t = 0.1)]
    pub val_fraction: f64,

    /// Only use the first N training images
    #[arg(long)]
    pub limit: Option<usize>,

    /// Seed for weight init, shuffling and the validation split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Data loader worker threads
    #[arg(long, default_value_t = 2)]
    pub num_workers: usize,

    #[arg(long, value_enum, default_value_t = BackendArg::Ndarray)]
    pub backend: BackendArg,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            checkpoint_dir: a.checkpoint_dir,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            hidden_dim:     a.hidden_dim,
            latent_dim:     a.latent_dim,
            val_fraction:   a.val_fraction,
            limit:          a.limit,
            seed:           a.seed,
            num_workers:    a.num_workers,
            backend:        a.backend.into(),
        }
    }
}

/// All arguments for the `reconstruct` command
#[derive(Args, Debug)]
pub struct ReconstructArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// How many test images to reconstruct
    #[arg(long, default_value_t = 8)]
    pub count: usize,

    /// Index of the first test image
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// PNG file to write
    #[arg(long, default_value = "reconstruction.png")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = BackendArg::Ndarray)]
    pub backend: BackendArg,
}

impl From<ReconstructArgs> for ReconstructConfig {
    fn from(a: ReconstructArgs) -> Self {
        ReconstructConfig {
            checkpoint_dir: a.checkpoint_dir,
            count:          a.count,
            offset:         a.offset,
            output:         a.output,
            backend:        a.backend.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["mnist-autoencoder", "train"]);
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();

        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.lr, def.lr);
        assert_eq!(cfg.latent_dim, def.latent_dim);
        assert_eq!(cfg.backend, def.backend);
    }

    #[test]
    fn test_reconstruct_flags() {
        let cli = Cli::parse_from([
            "mnist-autoencoder", "reconstruct",
            "--count", "3", "--offset", "10", "--backend", "wgpu",
        ]);
        let Commands::Reconstruct(args) = cli.command else { panic!("expected reconstruct") };
        let cfg: ReconstructConfig = args.into();

        assert_eq!(cfg.count, 3);
        assert_eq!(cfg.offset, 10);
        assert_eq!(cfg.backend, BackendKind::Wgpu);
        assert_eq!(cfg.output, PathBuf::from("reconstruction.png"));
    }
}

// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// All work is delegated to Layer 2 (application).
//
//   1. `train`       — trains the autoencoder on MNIST
//   2. `reconstruct` — loads a checkpoint and plots reconstructions
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ReconstructArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "mnist-autoencoder",
    version,
    about = "Train a fully-connected autoencoder on MNIST, then plot its reconstructions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)       => run_train(args),
            Commands::Reconstruct(args) => run_reconstruct(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training, checkpoints go to: {}", args.checkpoint_dir);

    let outcome = TrainUseCase::new(args.into()).execute()?;
    let report  = &outcome.report;

    println!("Training complete. Best epoch: {}", report.best_epoch);
    if let Some(last) = report.final_metrics() {
        println!("Final train_loss={:.6} val_loss={:.6}", last.train_loss, last.val_loss);
    }
    if let Some(pair) = &report.sample {
        println!("Sample reconstruction MSE: {:.6}", pair.mse());
    }
    println!("Wrote {}", outcome.metrics_csv.display());
    for path in [&outcome.sample_plot, &outcome.loss_plot].into_iter().flatten() {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_reconstruct(args: ReconstructArgs) -> Result<()> {
    use crate::application::reconstruct_use_case::ReconstructUseCase;

    let summary = ReconstructUseCase::new(args.into()).execute()?;

    println!("Checkpoint epoch {}", summary.epoch);
    for (i, mse) in summary.mse.iter().enumerate() {
        println!("  image {:>3}: mse={:.6}", i, mse);
    }
    println!(
        "Mean MSE {:.6} | latent mean {:.4} | {:.1}% latent units inactive",
        summary.mean_mse,
        summary.latent.mean_activation,
        summary.latent.zero_fraction * 100.0,
    );
    println!("Wrote {}", summary.output.display());
    Ok(())
}

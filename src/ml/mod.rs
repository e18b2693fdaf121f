// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The Burn-specific pieces of the system:
//
//   model.rs         — The autoencoder architecture
//                      784 → 128 → 128 (latent) → 128 → 784,
//                      ReLU after every Linear layer,
//                      MSE reconstruction loss
//
//   trainer.rs       — The training loop
//                      Forward pass, loss, backward pass, Adam
//                      step, validation and per-epoch checkpoints
//
//   reconstructor.rs — Inference
//                      Loads a checkpoint, reconstructs images,
//                      exposes latent codes
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Fully-connected autoencoder architecture
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Inference — loads a checkpoint and reconstructs images
pub mod reconstructor;

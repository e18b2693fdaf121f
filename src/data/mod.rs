// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the MNIST download to tensor batches.
//
//   MNIST (Burn dataset utility)
//       │
//       ▼
//   MnistLoader       → reads a split, hands raw grids on
//       │
//       ▼
//   Normalizer        → 0..=255 → [0, 1], row-major flatten
//       │
//       ▼
//   split_train_val   → seeded holdout for validation
//       │
//       ▼
//   ImageDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher      → stacks images into [N, 784] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads MNIST splits through Burn's vision datasets
pub mod loader;

/// Converts raw intensities into normalised images
pub mod normalizer;

/// Implements Burn's Dataset trait for images
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;

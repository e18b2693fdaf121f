// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in a business layer:
//
//   checkpoint.rs — Saving and loading model weights with Burn's
//                   CompactRecorder, plus the TrainConfig as JSON
//                   so inference can rebuild the model.
//
//   metrics.rs    — Per-epoch loss written to a CSV file.
//
//   plotter.rs    — PNG output: original vs. reconstruction
//                   grids and the loss curve.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Reconstruction and loss-curve plots
pub mod plotter;

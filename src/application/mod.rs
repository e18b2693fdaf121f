// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish a
// specific goal (training, or reconstructing test images).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing to the user here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern

// The training workflow
pub mod train_use_case;

// Reconstruct-and-plot workflow on a trained checkpoint
pub mod reconstruct_use_case;

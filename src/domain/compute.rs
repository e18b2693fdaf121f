// ============================================================
// Layer 3 — Compute Backend Selection
// ============================================================
// The application chooses a backend by name; the ML layer maps
// the name onto a concrete Burn backend type. Keeping this as a
// plain enum means configs can be saved to JSON and the CLI can
// offer it as a flag without either depending on Burn.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Pure-Rust CPU backend
    #[default]
    NdArray,

    /// GPU backend through WebGPU
    Wgpu,
}

// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts
// of the system: images, reconstructions, and where images
// come from.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A normalised 28×28 grayscale image and its reconstruction
pub mod image;

// Which compute backend a run should use
pub mod compute;

// Core abstractions (traits) that other layers implement
pub mod traits;

// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types describing the trained network and the
// arrays derived from it.
//
// Rules for this layer:
//   - NO file I/O
//   - NO C syntax (that's Layer 4)
//   - Only structs, enums, traits and their invariants

// Error taxonomy shared by every layer below the CLI
pub mod error;

// Rank-N f32 tensor with row-major indexing
pub mod tensor;

// Axis permutations applied by the reshaper
pub mod layout;

// Layers, trained model and named parameter sets
pub mod model;

// Fixed dimensions of the inference kernel
pub mod geometry;

// Abstractions over where the model comes from
pub mod traits;

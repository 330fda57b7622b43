// ============================================================
// Layer 4 - Code Generation
// ============================================================
// Everything between a framework-layout tensor and the text of
// a C header. The pipeline flows in this order:
//
//   framework tensor
//       │
//       ▼
//   reshaper      → permutes axes into the C kernel's order
//       │
//       ▼
//   formatter     → nested brace initializer text
//       │
//       ▼
//   header        → declarations + guard + provenance
//
// definitions.rs supplies the constants every header refers to.
// Nothing in this layer touches the filesystem.

/// Axis permutations and the per-layer weight transforms
pub mod reshaper;

/// Tensor → C initializer text
pub mod formatter;

/// Declarations and complete header text
pub mod header;

/// Constants of definitions.h
pub mod definitions;

// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Coordinates the other layers to accomplish one goal:
// exporting headers, or inspecting a model file.
//
// Rules for this layer:
//   - No tensor math or C syntax here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Files are read and written only through Layer 5

// Selectors, the export pipeline and its report
pub mod pipeline;

// The export workflow and its configuration
pub mod export_use_case;

// Model listing for the `inspect` command
pub mod inspect_use_case;

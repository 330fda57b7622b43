// ============================================================
// Layer 5 - Infrastructure Layer
// ============================================================
// Everything that touches the filesystem:
//
//   model_store.rs    reads the trained model (JSON) exported by
//                     the training step
//
//   config_store.rs   reads and writes ExportConfig files
//
//   header_writer.rs  puts a rendered header set on disk, all
//                     or nothing, via staged temp files
//
// Loaders return anyhow errors with the offending path attached.
// The header writer reports ExportError::IoWrite so the pipeline
// keeps a single typed error surface.

/// Trained model loading
pub mod model_store;

/// Export configuration files
pub mod config_store;

/// Two-phase header writing
pub mod header_writer;

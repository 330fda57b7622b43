// ============================================================
// Layer 3 - Export Errors
// ============================================================
// Every failure the export core can produce. None of these are
// transient: they mean the configuration, the model file or the
// filesystem disagrees with what the inference kernel expects,
// so nothing in the crate retries them.
//
//   ShapeMismatch      layout, rank or dimension disagreement
//   LayerKindMismatch  the model architecture changed
//   LayerNotFound      a required selector points nowhere
//   NonFiniteValue     NaN / inf cannot be a C literal
//   InvalidConfig      geometry or selector settings rejected
//   IoWrite            writing a header failed

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::model::LayerKind;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context:  String,
        expected: Vec<usize>,
        actual:   Vec<usize>,
    },

    #[error("Layer kind mismatch for '{label}' at {selector}: expected {expected}, found {actual}")]
    LayerKindMismatch {
        label:    String,
        selector: String,
        expected: LayerKind,
        actual:   LayerKind,
    },

    #[error("No layer at {selector} for '{label}'")]
    LayerNotFound { label: String, selector: String },

    #[error("Non-finite value in {label} {tensor} at flat index {index}")]
    NonFiniteValue {
        label:  String,
        tensor: &'static str,
        index:  usize,
    },

    #[error("Invalid export configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot write '{}': {source}", .path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Shorthand used by the shape checks scattered through the core.
    pub fn shape(context: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        ExportError::ShapeMismatch {
            context:  context.into(),
            expected: expected.to_vec(),
            actual:   actual.to_vec(),
        }
    }
}

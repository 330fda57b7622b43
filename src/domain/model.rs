// ============================================================
// Layer 3 - Trained Model Domain Types
// ============================================================
// The network produced by the (external) training step, as a
// closed set of layer variants in execution order:
//
//   0  zero_padding   pads the image by floor(kernel / 2)
//   1  convolution    weights (kr, kc, 1, filters), biases (filters)
//   2  pooling        max pool
//   3  flatten        (pool_r, pool_c, filters) → flat vector
//   4  dense          weights (flat, dense), biases (dense)
//
// Weight tensors are kept exactly as the training framework
// stores them; reordering them for the C kernel is the job of
// codegen::reshaper, not of this module.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::{ExportError, ExportResult};
use crate::domain::tensor::Tensor;

/// One stage of the trained network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    ZeroPadding {
        name:    String,
        padding: usize,
    },
    Convolution {
        name:    String,
        weights: Tensor,
        biases:  Tensor,
    },
    Pooling {
        name:      String,
        pool_rows: usize,
        pool_cols: usize,
    },
    Flatten {
        name: String,
    },
    Dense {
        name:    String,
        weights: Tensor,
        biases:  Tensor,
    },
}

/// Tag of a Layer variant, used by selectors to state what they expect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    ZeroPadding,
    Convolution,
    Pooling,
    Flatten,
    Dense,
}

impl LayerKind {
    /// Only convolution and dense layers carry exportable parameters
    pub fn has_parameters(self) -> bool {
        matches!(self, LayerKind::Convolution | LayerKind::Dense)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayerKind::ZeroPadding => "zero_padding",
            LayerKind::Convolution => "convolution",
            LayerKind::Pooling     => "pooling",
            LayerKind::Flatten     => "flatten",
            LayerKind::Dense       => "dense",
        };
        f.write_str(s)
    }
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::ZeroPadding { .. } => LayerKind::ZeroPadding,
            Layer::Convolution { .. } => LayerKind::Convolution,
            Layer::Pooling { .. }     => LayerKind::Pooling,
            Layer::Flatten { .. }     => LayerKind::Flatten,
            Layer::Dense { .. }       => LayerKind::Dense,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Layer::ZeroPadding { name, .. }
            | Layer::Convolution { name, .. }
            | Layer::Pooling { name, .. }
            | Layer::Flatten { name }
            | Layer::Dense { name, .. } => name,
        }
    }

    /// (weights, biases) of a parameterised layer
    pub fn parameters(&self) -> Option<(&Tensor, &Tensor)> {
        match self {
            Layer::Convolution { weights, biases, .. }
            | Layer::Dense { weights, biases, .. } => Some((weights, biases)),
            _ => None,
        }
    }
}

/// The trained network: an ordered list of layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SequentialModel {
    pub layers: Vec<Layer>,
}

impl SequentialModel {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }
}

// ─── NamedParameterSet ────────────────────────────────────────────────────────
/// A layer's parameters under the label used for the generated C names
/// ("conv" → conv_weights / conv_biases).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParameterSet {
    pub label:   String,
    pub weights: Tensor,
    pub biases:  Tensor,
}

impl NamedParameterSet {
    /// Pair a label with a layer's tensors. The biases must be rank-1
    /// with one entry per output channel, which the framework stores as
    /// the last weight axis.
    pub fn new(label: impl Into<String>, weights: &Tensor, biases: &Tensor) -> ExportResult<Self> {
        let label = label.into();
        let out_channels = weights.shape().last().copied().unwrap_or(1);

        if biases.shape() != [out_channels] {
            return Err(ExportError::shape(
                format!("{label} biases vs weight output channels"),
                &[out_channels],
                biases.shape(),
            ));
        }

        for (tensor, name) in [(weights, "weights"), (biases, "biases")] {
            if let Some(index) = tensor.first_non_finite() {
                return Err(ExportError::NonFiniteValue {
                    label: label.clone(),
                    tensor: name,
                    index,
                });
            }
        }

        Ok(Self {
            label,
            weights: weights.clone(),
            biases:  biases.clone(),
        })
    }
}

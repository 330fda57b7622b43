// ============================================================
// Layer 5 - Model Store
// ============================================================
// Loads the trained network handed over by the training step.
//
// File format (JSON):
//   {
//     "layers": [
//       { "kind": "zero_padding", "name": "padding_layer", "padding": 3 },
//       { "kind": "convolution",  "name": "convolution_layer",
//         "weights": { "shape": [7, 7, 1, 4], "values": [...] },
//         "biases":  { "shape": [4], "values": [...] } },
//       { "kind": "pooling", "name": "max_pooling_layer",
//         "pool_rows": 2, "pool_cols": 2 },
//       { "kind": "flatten", "name": "flatten_layer" },
//       { "kind": "dense",   "name": "dense_layer",
//         "weights": { "shape": [784, 10], "values": [...] },
//         "biases":  { "shape": [10], "values": [...] } }
//     ]
//   }
//
// Tensors stay in the framework's own layout. Shape/buffer
// agreement is checked while deserialising.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::model::SequentialModel;
use crate::domain::traits::ModelSource;

pub struct JsonModelStore {
    path: PathBuf,
}

impl JsonModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModelSource for JsonModelStore {
    fn load_model(&self) -> Result<SequentialModel> {
        let json = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Cannot read model from '{}'. Has the training step exported it?",
                self.path.display()
            )
        })?;

        let model: SequentialModel = serde_json::from_str(&json)
            .with_context(|| format!("Invalid model file '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded model '{}' with {} layers",
            self.path.display(),
            model.layers.len()
        );
        for (i, layer) in model.layers.iter().enumerate() {
            tracing::debug!("  layer {}: {} ({})", i, layer.name(), layer.kind());
        }

        Ok(model)
    }
}

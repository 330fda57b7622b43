// ============================================================
// Layer 2 - InspectUseCase
// ============================================================
// Lists what a model file contains, so a selector configuration
// can be checked against it before exporting.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::domain::{model::LayerKind, traits::{ModelSource, TrainedModel}};
use crate::infra::model_store::JsonModelStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub index:   usize,
    pub name:    String,
    pub kind:    LayerKind,
    /// Framework-layout shapes, present for parameterised layers only
    pub weights: Option<Vec<usize>>,
    pub biases:  Option<Vec<usize>>,
}

pub fn summarize<M: TrainedModel>(model: &M) -> Vec<LayerSummary> {
    model
        .layers()
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            let params = layer.parameters();
            LayerSummary {
                index,
                name:    layer.name().to_string(),
                kind:    layer.kind(),
                weights: params.map(|(w, _)| w.shape().to_vec()),
                biases:  params.map(|(_, b)| b.shape().to_vec()),
            }
        })
        .collect()
}

pub struct InspectUseCase {
    model_path: PathBuf,
}

impl InspectUseCase {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self { model_path: model_path.into() }
    }

    pub fn execute(&self) -> Result<Vec<LayerSummary>> {
        let model = JsonModelStore::new(&self.model_path).load_model()?;
        Ok(summarize(&model))
    }
}

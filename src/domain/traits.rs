// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The export pipeline never cares where a trained model came
// from. It only needs ordered access to the layers:
//
//   TrainedModel  read access to layers by index or by name
//   ModelSource   anything that can produce a trained model
//                 (JSON file today, see infra::model_store)

use anyhow::Result;

use crate::domain::model::{Layer, SequentialModel};

// ─── TrainedModel ─────────────────────────────────────────────────────────────
/// Read-only view of a trained network's layers, in execution order.
pub trait TrainedModel {
    fn layers(&self) -> &[Layer];

    fn layer_at(&self, index: usize) -> Option<&Layer> {
        self.layers().get(index)
    }

    /// First layer with the given name
    fn layer_named(&self, name: &str) -> Option<&Layer> {
        self.layers().iter().find(|l| l.name() == name)
    }
}

impl TrainedModel for SequentialModel {
    fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

// ─── ModelSource ──────────────────────────────────────────────────────────────
/// Any component that can load a trained model.
pub trait ModelSource {
    fn load_model(&self) -> Result<SequentialModel>;
}

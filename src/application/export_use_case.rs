// ============================================================
// Layer 2 - ExportUseCase
// ============================================================
// Runs one export end to end:
//
//   Step 1: Validate the configuration
//   Step 2: Load the trained model         (Layer 5 - infra)
//   Step 3: Build the pipeline from config (Layer 4 - codegen)
//   Step 4: Render and write all headers   (Layer 2 - pipeline)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::pipeline::{
    default_selectors, validate_selectors, ExportReport, LayerSelector, ParamExportPipeline,
    DEFAULT_PROVENANCE,
};
use crate::codegen::{formatter::ArrayFormatter, header::{HeaderEmitter, IncludeGuard}};
use crate::domain::{
    error::{ExportError, ExportResult},
    geometry::NetworkGeometry,
    traits::ModelSource,
};
use crate::infra::model_store::JsonModelStore;

// ─── Export Configuration ─────────────────────────────────────────────────────
// Everything one export run needs. Any field missing from a config
// file falls back to the reference network's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub model_path: PathBuf,
    pub output_dir: PathBuf,
    pub geometry:   NetworkGeometry,
    pub provenance: String,
    pub guard:      IncludeGuard,
    pub indent:     String,
    pub selectors:  Vec<LayerSelector>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("Model/model.json"),
            output_dir: PathBuf::from("Headers"),
            geometry:   NetworkGeometry::default(),
            provenance: DEFAULT_PROVENANCE.to_string(),
            guard:      IncludeGuard::PragmaOnce,
            indent:     "\t".to_string(),
            selectors:  default_selectors(),
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> ExportResult<()> {
        self.geometry.validate()?;
        validate_selectors(&self.selectors)?;

        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ExportError::InvalidConfig(format!(
                "indent {:?} may only contain spaces and tabs",
                self.indent
            )));
        }
        if self.provenance.contains("*/") {
            return Err(ExportError::InvalidConfig(
                "provenance cannot contain '*/'".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── ExportUseCase ────────────────────────────────────────────────────────────
pub struct ExportUseCase {
    config: ExportConfig,
}

impl ExportUseCase {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ExportReport> {
        let cfg = &self.config;

        // ── Step 1: Validate ─────────────────────────────────────────────────
        cfg.validate()?;
        tracing::info!(
            "Exporting '{}' into '{}' ({} selectors)",
            cfg.model_path.display(),
            cfg.output_dir.display(),
            cfg.selectors.len()
        );
        tracing::debug!("Geometry: {:?}", cfg.geometry);

        // ── Step 2: Load model ───────────────────────────────────────────────
        let model = JsonModelStore::new(&cfg.model_path).load_model()?;

        // ── Step 3: Build pipeline ───────────────────────────────────────────
        let pipeline = ParamExportPipeline::new(cfg.geometry)
            .with_formatter(ArrayFormatter::new(cfg.indent.as_str()))
            .with_emitter(HeaderEmitter::new(cfg.guard))
            .with_provenance(cfg.provenance.as_str());

        // ── Step 4: Export ───────────────────────────────────────────────────
        let report = pipeline.export(&model, &cfg.selectors, &cfg.output_dir)?;

        tracing::info!(
            "Export complete: {} files written, {} selectors skipped",
            report.files.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the subcommands `export`, `inspect` and `config` and
// their flags.
//
// Precedence for export settings, lowest first:
//   built-in defaults  <  --config FILE  <  --model / --out-dir

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::export_use_case::ExportConfig;
use crate::infra::config_store::load_config;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate definitions.h and the weight headers from a trained model
    Export(ExportArgs),

    /// List the layers of a trained model with their parameter shapes
    Inspect(InspectArgs),

    /// Write the default export configuration to a file for editing
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Trained model file (JSON) [default: Model/model.json]
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Directory that receives the generated headers [default: Headers]
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Export configuration file (JSON); flags above override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write the export report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl ExportArgs {
    /// Build the application-layer config from defaults, file and flags.
    /// The application layer never sees clap types.
    pub fn resolve_config(&self) -> Result<ExportConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => ExportConfig::default(),
        };
        if let Some(model) = &self.model {
            cfg.model_path = model.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            cfg.output_dir = out_dir.clone();
        }
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Trained model file (JSON)
    #[arg(long, default_value = "Model/model.json")]
    pub model: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Where to write the configuration
    #[arg(long, default_value = "export.json")]
    pub out: PathBuf,
}

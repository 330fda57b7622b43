// ============================================================
// Layer 5 - Config Store
// ============================================================
// Reads and writes ExportConfig as JSON. Fields left out of the
// file keep their defaults, so a config can be as small as:
//
//   { "geometry": { "filters": 8 }, "guard": "macro" }
//
// Validation happens in the use case, after CLI overrides.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::application::export_use_case::ExportConfig;

pub fn load_config(path: &Path) -> Result<ExportConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

    let cfg = serde_json::from_str(&json)
        .with_context(|| format!("Invalid config file '{}'", path.display()))?;

    tracing::debug!("Loaded export config from '{}'", path.display());
    Ok(cfg)
}

pub fn save_config(path: &Path, cfg: &ExportConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(cfg)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

    tracing::info!("Saved export config to '{}'", path.display());
    Ok(())
}

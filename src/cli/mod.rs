// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Arguments are parsed with
// clap; all work is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `export`  - writes definitions.h and the weight headers
//   2. `inspect` - lists the layers of a trained model
//   3. `config`  - writes the default export configuration

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, ConfigArgs, ExportArgs, InspectArgs};
use std::fs;

#[derive(Parser, Debug)]
#[command(
    name = "cnn-param-export",
    version = "0.1.0",
    about = "Export a trained CNN's parameters as C headers for a dependency-free inference kernel."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. Only routing and printing here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Export(args)  => run_export(args),
            Commands::Inspect(args) => run_inspect(args),
            Commands::Config(args)  => run_config(args),
        }
    }
}

fn run_export(args: ExportArgs) -> Result<()> {
    use crate::application::export_use_case::ExportUseCase;

    let config = args.resolve_config()?;
    let report = ExportUseCase::new(config).execute()?;

    for file in &report.files {
        println!(
            "Wrote {} ({} declarations, {} bytes)",
            file.path.display(),
            file.declarations,
            file.bytes
        );
    }
    for skipped in &report.skipped {
        println!("Skipped '{}' at {}: {}", skipped.label, skipped.selector, skipped.reason);
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write report to '{}'", path.display()))?;
        tracing::info!("Saved export report to '{}'", path.display());
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let layers = InspectUseCase::new(&args.model).execute()?;

    println!("{:>5}  {:<24} {:<14} {:<18} biases", "index", "name", "kind", "weights");
    for l in &layers {
        let shape = |s: &Option<Vec<usize>>| match s {
            Some(dims) => format!("{dims:?}"),
            None => "-".to_string(),
        };
        println!(
            "{:>5}  {:<24} {:<14} {:<18} {}",
            l.index,
            l.name,
            l.kind.to_string(),
            shape(&l.weights),
            shape(&l.biases)
        );
    }
    Ok(())
}

fn run_config(args: ConfigArgs) -> Result<()> {
    use crate::application::export_use_case::ExportConfig;
    use crate::infra::config_store::save_config;

    save_config(&args.out, &ExportConfig::default())?;
    println!("Default export configuration written to {}", args.out.display());
    Ok(())
}

//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use mesh::{MeshSession, Operation, PipelineConfig, SessionSettings};
use tracing::info;

/// Print the defect report of `path`.
pub fn analyze(path: &Path) -> Result<()> {
    let mesh = mesh::io::load_mesh(path).with_context(|| format!("reading {}", path.display()))?;
    let report = mesh::repair::analyze(&mesh);
    println!("{}", path.display());
    print!("{report}");
    Ok(())
}

/// Repair `input` and write the result to `output`.
///
/// The mesh keeps its original placement.
pub fn repair(input: &Path, output: Option<&Path>) -> Result<()> {
    let output = output.map_or_else(|| sibling_path(input, "repaired"), Path::to_path_buf);
    let mut session = MeshSession::with_settings(SessionSettings {
        center_on_load: false,
        ..SessionSettings::default()
    });

    session
        .load_file(input)
        .with_context(|| format!("loading {}", input.display()))?;
    let report = session.apply(&Operation::Repair)?;
    println!("{}", report.summary);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    session
        .save_working(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Saved {}", output.display());
    Ok(())
}

/// Run the pipeline in `config` on `input`.
pub fn process(input: &Path, config: &Path, output: Option<&Path>) -> Result<()> {
    let pipeline = PipelineConfig::from_file(config)?;
    if pipeline.operations.is_empty() {
        bail!("{} lists no operations", config.display());
    }
    let output = output.map_or_else(|| sibling_path(input, "processed"), Path::to_path_buf);

    let mut session = MeshSession::from_config(&pipeline);
    session
        .load_file(input)
        .with_context(|| format!("loading {}", input.display()))?;
    info!(
        operations = pipeline.operations.len(),
        "Running pipeline from {}",
        config.display()
    );

    for operation in &pipeline.operations {
        let report = session.apply(operation)?;
        println!("{report}");
    }

    session
        .save_working(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Saved {}", output.display());
    Ok(())
}

/// `dir/stem.ext` becomes `dir/stem_<suffix>.ext`.
fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "mesh".into(), |s| s.to_string_lossy());
    let name = match input.extension() {
        Some(ext) => format!("{stem}_{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{suffix}"),
    };
    input.with_file_name(name)
}

//! shieldgen command-line interface.
//!
pub mod config;
pub mod entry;
pub mod options;
pub mod output;
pub mod pipeline;

use std::path::PathBuf;

use shieldgen_core::{InclusionPolicy, ManifestSettings, Result};

pub use config::{ConfigFile, build_options};
pub use options::{InputOptions, PolicyOptions, ProcessingOptions};
pub use pipeline::{RunReport, process_project_graph};

/// Options for running shieldgen.
#[derive(Debug, Clone)]
pub struct ShieldgenOptions {
    pub project: PathBuf,
    pub manifest: ManifestSettings,
    pub policy: InclusionPolicy,
    pub parallel: bool,
    pub output: Option<PathBuf>,
}

/// Main entry point: run the pipeline and return the report with the rendered manifest.
///
/// When `opts.output` is set the manifest is also written there.
pub fn run_main(opts: &ShieldgenOptions) -> Result<(RunReport, String)> {
    let report = process_project_graph(opts)?;
    let rendered = report.manifest.render()?;
    if let Some(path) = &opts.output {
        output::write_manifest(path, &rendered)?;
    }
    Ok((report, rendered))
}

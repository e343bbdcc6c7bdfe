//! Command-line option groups.
//!
//! Every value here is optional so a config file can supply it instead;
//! see [`crate::config::build_options`] for how the two layers merge.

use std::path::PathBuf;

use clap::Args;

/// Where to start and where the renaming tool reads and writes binaries.
#[derive(Args, Debug, Clone, Default)]
pub struct InputOptions {
    /// Entry-point project descriptor (.csproj)
    #[arg(short = 'p', long = "project", value_name = "FILE")]
    pub project: Option<PathBuf>,

    /// Input root directory, written as the manifest's InPath variable
    #[arg(long = "in-dir", value_name = "DIR")]
    pub in_dir: Option<String>,

    /// Output root directory, written as the manifest's OutPath variable
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<String>,
}

/// Which resolved projects end up in the manifest.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyOptions {
    /// Comma-separated project names to leave out of the manifest
    #[arg(long = "ignore", value_name = "NAMES")]
    pub ignore: Option<String>,

    /// Leave out projects that carry UI markup files
    #[arg(long = "exclude-ui-projects")]
    pub exclude_ui_projects: bool,

    /// Leave out projects whose name contains the plugin marker
    #[arg(long = "exclude-plugins")]
    pub exclude_plugins: bool,

    /// Name substring that marks a plugin project (default: "Plugin")
    #[arg(long = "plugin-marker", value_name = "TEXT")]
    pub plugin_marker: Option<String>,
}

/// Options for controlling processing behavior.
#[derive(Args, Debug, Clone, Default)]
pub struct ProcessingOptions {
    /// Extract shielded types for several projects in parallel.
    #[arg(long)]
    pub parallel: bool,
}

impl InputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: impl Into<PathBuf>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_dirs(mut self, in_dir: impl Into<String>, out_dir: impl Into<String>) -> Self {
        self.in_dir = Some(in_dir.into());
        self.out_dir = Some(out_dir.into());
        self
    }
}

impl PolicyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore(mut self, ignore: impl Into<String>) -> Self {
        self.ignore = Some(ignore.into());
        self
    }

    pub fn with_exclude_ui_projects(mut self, exclude: bool) -> Self {
        self.exclude_ui_projects = exclude;
        self
    }

    pub fn with_exclude_plugins(mut self, exclude: bool) -> Self {
        self.exclude_plugins = exclude;
        self
    }
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

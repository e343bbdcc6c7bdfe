//! Which resolved projects make it into the manifest.

use std::collections::BTreeSet;
use std::fmt;

use crate::descriptor::ProjectDescriptor;

/// Substring that marks a plugin project by name.
pub const DEFAULT_PLUGIN_MARKER: &str = "Plugin";

/// Why a project was left out of the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExclusionReason {
    /// Targets a legacy runtime the renaming tool cannot rewrite.
    LegacyRuntime,
    /// Named in the ignore list.
    Ignored,
    /// Carries UI markup and UI projects are excluded.
    UiProject,
    /// Name contains the plugin marker and plugins are excluded.
    Plugin,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::LegacyRuntime => "legacy runtime target",
            ExclusionReason::Ignored => "ignore list",
            ExclusionReason::UiProject => "ui project",
            ExclusionReason::Plugin => "plugin",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Included,
    Excluded(ExclusionReason),
}

/// Pure inclusion predicate over resolved descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionPolicy {
    pub ignore: BTreeSet<String>,
    pub exclude_ui_projects: bool,
    pub exclude_plugins: bool,
    pub plugin_marker: String,
}

impl Default for InclusionPolicy {
    fn default() -> Self {
        Self {
            ignore: BTreeSet::new(),
            exclude_ui_projects: false,
            exclude_plugins: false,
            plugin_marker: DEFAULT_PLUGIN_MARKER.to_string(),
        }
    }
}

impl InclusionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
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

    pub fn with_plugin_marker(mut self, marker: impl Into<String>) -> Self {
        self.plugin_marker = marker.into();
        self
    }

    /// Decide whether `project` is included. Legacy targets are checked first.
    pub fn decide(&self, project: &ProjectDescriptor) -> Inclusion {
        if project.is_legacy_runtime_target() {
            return Inclusion::Excluded(ExclusionReason::LegacyRuntime);
        }
        if self.ignore.contains(project.name()) {
            return Inclusion::Excluded(ExclusionReason::Ignored);
        }
        if self.exclude_ui_projects && !project.markup_files().is_empty() {
            return Inclusion::Excluded(ExclusionReason::UiProject);
        }
        if self.exclude_plugins
            && !self.plugin_marker.is_empty()
            && project.name().contains(&self.plugin_marker)
        {
            return Inclusion::Excluded(ExclusionReason::Plugin);
        }
        Inclusion::Included
    }

    pub fn is_included(&self, project: &ProjectDescriptor) -> bool {
        self.decide(project) == Inclusion::Included
    }
}

/// Split comma-separated project names, trimming blanks.
pub fn parse_name_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

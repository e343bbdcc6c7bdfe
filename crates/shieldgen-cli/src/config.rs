//! Optional TOML configuration file and its merge with command-line options.
//!
//! ```toml
//! [project]
//! entry = "src/Shell/Shell.csproj"   # relative to this file
//! in_dir = "build/bin"
//! out_dir = "build/obfuscated"
//!
//! [policy]
//! ignore = ["Shell.Tests"]
//! exclude_plugins = true
//!
//! [manifest]
//! binary_suffix = ".exe"
//! hide_strings = false
//! ```
//!
//! Command-line values win over file values; boolean switches and the ignore
//! list are combined.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use shieldgen_core::{InclusionPolicy, ManifestFlags, ManifestSettings, Result, parse_name_list};
use shieldgen_error::Error;

use crate::ShieldgenOptions;
use crate::options::{InputOptions, PolicyOptions, ProcessingOptions};

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub policy: PolicySection,
    pub manifest: ManifestSection,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
    pub entry: Option<PathBuf>,
    pub in_dir: Option<String>,
    pub out_dir: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicySection {
    pub ignore: Vec<String>,
    pub exclude_ui_projects: bool,
    pub exclude_plugins: bool,
    pub plugin_marker: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestSection {
    pub binary_suffix: Option<String>,
    pub log_file: Option<String>,
    pub keep_public_api: Option<bool>,
    pub hide_private_api: Option<bool>,
    pub rename_properties: Option<bool>,
    pub rename_events: Option<bool>,
    pub rename_fields: Option<bool>,
    pub hide_strings: Option<bool>,
}

impl ConfigFile {
    /// Parse config text. Relative entry paths are resolved against `base_dir`.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let mut config: ConfigFile = toml::from_str(text).map_err(|err| {
            Error::config_invalid(err.to_string())
                .with_operation("config::parse")
                .set_source(err)
        })?;
        if let Some(entry) = config.project.entry.take() {
            config.project.entry = Some(if entry.is_absolute() {
                entry
            } else {
                base_dir.join(entry)
            });
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            Error::config_invalid(format!("cannot read config file: {err}"))
                .with_operation("config::load")
                .with_path(path)
                .set_source(err)
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let config = Self::parse(&text, base_dir).map_err(|e| e.with_path(path))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }
}

impl ManifestSection {
    fn apply(&self, mut settings: ManifestSettings) -> ManifestSettings {
        if let Some(suffix) = &self.binary_suffix {
            settings.binary_suffix = suffix.clone();
        }
        if let Some(log_file) = &self.log_file {
            settings.log_file = log_file.clone();
        }
        let defaults = ManifestFlags::default();
        settings.flags = ManifestFlags {
            keep_public_api: self.keep_public_api.unwrap_or(defaults.keep_public_api),
            hide_private_api: self.hide_private_api.unwrap_or(defaults.hide_private_api),
            rename_properties: self.rename_properties.unwrap_or(defaults.rename_properties),
            rename_events: self.rename_events.unwrap_or(defaults.rename_events),
            rename_fields: self.rename_fields.unwrap_or(defaults.rename_fields),
            hide_strings: self.hide_strings.unwrap_or(defaults.hide_strings),
        };
        settings
    }
}

/// Merge command-line groups over the config file into runnable options.
///
/// Fails with `InvalidArgument` when neither layer names the entry project
/// or the input and output roots.
pub fn build_options(
    inputs: InputOptions,
    policy: PolicyOptions,
    processing: ProcessingOptions,
    output: Option<PathBuf>,
    config: ConfigFile,
) -> Result<ShieldgenOptions> {
    let project = inputs
        .project
        .or(config.project.entry)
        .ok_or_else(|| Error::invalid_argument("an entry project is required (--project)"))?;
    let in_dir = inputs
        .in_dir
        .or(config.project.in_dir)
        .ok_or_else(|| Error::invalid_argument("an input directory is required (--in-dir)"))?;
    let out_dir = inputs
        .out_dir
        .or(config.project.out_dir)
        .ok_or_else(|| Error::invalid_argument("an output directory is required (--out-dir)"))?;

    let mut ignore = config.policy.ignore;
    if let Some(list) = &policy.ignore {
        ignore.extend(parse_name_list(list));
    }
    let mut inclusion = InclusionPolicy::new()
        .with_ignore(ignore)
        .with_exclude_ui_projects(policy.exclude_ui_projects || config.policy.exclude_ui_projects)
        .with_exclude_plugins(policy.exclude_plugins || config.policy.exclude_plugins);
    if let Some(marker) = policy.plugin_marker.or(config.policy.plugin_marker) {
        inclusion = inclusion.with_plugin_marker(marker);
    }

    let manifest = config.manifest.apply(ManifestSettings::new(in_dir, out_dir));

    Ok(ShieldgenOptions {
        project,
        manifest,
        policy: inclusion,
        parallel: processing.parallel,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shieldgen_error::ErrorKind;

    #[test]
    fn test_parse_full_config() {
        let text = r#"
[project]
entry = "src/Shell/Shell.csproj"
in_dir = "bin"
out_dir = "obf"

[policy]
ignore = ["Shell.Tests"]
exclude_plugins = true
plugin_marker = "Addin"

[manifest]
binary_suffix = ".exe"
hide_strings = false
"#;
        let config = ConfigFile::parse(text, Path::new("/repo")).unwrap();
        assert_eq!(
            config.project.entry,
            Some(PathBuf::from("/repo/src/Shell/Shell.csproj"))
        );
        assert_eq!(config.policy.ignore, vec!["Shell.Tests"]);
        assert!(config.policy.exclude_plugins);
        assert_eq!(config.manifest.hide_strings, Some(false));
    }

    #[test]
    fn test_unknown_key_is_config_invalid() {
        let err = ConfigFile::parse("[policy]\nignored = []\n", Path::new(".")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_missing_config_file_is_config_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load(&dir.path().join("shieldgen.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = ConfigFile::parse(
            "[project]\nentry = \"/cfg/App.csproj\"\nin_dir = \"cfg-in\"\nout_dir = \"cfg-out\"\n[policy]\nignore = [\"A\"]\n",
            Path::new("/"),
        )
        .unwrap();
        let opts = build_options(
            InputOptions::new().with_project("/cli/App.csproj"),
            PolicyOptions::new().with_ignore("B, C").with_exclude_ui_projects(true),
            ProcessingOptions::new().with_parallel(true),
            None,
            config,
        )
        .unwrap();

        assert_eq!(opts.project, PathBuf::from("/cli/App.csproj"));
        assert_eq!(opts.manifest.in_path, "cfg-in");
        assert_eq!(opts.manifest.out_path, "cfg-out");
        assert_eq!(
            opts.policy.ignore.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
        assert!(opts.policy.exclude_ui_projects);
        assert!(opts.parallel);
        assert_eq!(opts.manifest.flags, ManifestFlags::default());
    }

    #[test]
    fn test_missing_entry_is_invalid_argument() {
        let err = build_options(
            InputOptions::new(),
            PolicyOptions::new(),
            ProcessingOptions::new(),
            None,
            ConfigFile::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

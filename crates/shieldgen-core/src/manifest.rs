//! Manifest document model and rendering.
//!
//! The manifest is an Obfuscar-style XML file: global `<Var>` settings, one
//! `<Module>` per included project, and one `<SkipType>` per shielded type.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::MAIN_SEPARATOR;

use shieldgen_error::{Error, ErrorKind, Result};

use crate::descriptor::ProjectDescriptor;

pub const IN_PATH_VAR: &str = "InPath";
pub const OUT_PATH_VAR: &str = "OutPath";
pub const LOG_FILE_VAR: &str = "LogFile";

/// Renaming-tool switches written as global variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFlags {
    pub keep_public_api: bool,
    pub hide_private_api: bool,
    pub rename_properties: bool,
    pub rename_events: bool,
    pub rename_fields: bool,
    pub hide_strings: bool,
}

impl Default for ManifestFlags {
    fn default() -> Self {
        Self {
            keep_public_api: false,
            hide_private_api: true,
            rename_properties: true,
            rename_events: true,
            rename_fields: true,
            hide_strings: true,
        }
    }
}

impl ManifestFlags {
    fn as_vars(&self) -> [(&'static str, bool); 6] {
        [
            ("KeepPublicApi", self.keep_public_api),
            ("HidePrivateApi", self.hide_private_api),
            ("RenameProperties", self.rename_properties),
            ("RenameEvents", self.rename_events),
            ("RenameFields", self.rename_fields),
            ("HideStrings", self.hide_strings),
        ]
    }
}

/// Everything the manifest needs besides the projects themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSettings {
    pub in_path: String,
    pub out_path: String,
    /// File name of the renaming log, placed under the output path.
    pub log_file: String,
    /// Suffix appended to a project name to get its built artifact.
    pub binary_suffix: String,
    pub flags: ManifestFlags,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            in_path: String::new(),
            out_path: String::new(),
            log_file: "Mapping.txt".to_string(),
            binary_suffix: ".dll".to_string(),
            flags: ManifestFlags::default(),
        }
    }
}

impl ManifestSettings {
    pub fn new(in_path: impl Into<String>, out_path: impl Into<String>) -> Self {
        Self {
            in_path: in_path.into(),
            out_path: out_path.into(),
            ..Self::default()
        }
    }

    pub fn with_log_file(mut self, log_file: impl Into<String>) -> Self {
        self.log_file = log_file.into();
        self
    }

    pub fn with_binary_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.binary_suffix = suffix.into();
        self
    }

    pub fn with_flags(mut self, flags: ManifestFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// One type the renaming tool must leave alone, members and accessors included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipTypeEntry {
    pub name: String,
    pub skip_fields: bool,
    pub skip_properties: bool,
}

impl SkipTypeEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skip_fields: true,
            skip_properties: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub project: String,
    /// Artifact path, addressed through the input-path variable.
    pub file: String,
    pub skip_types: Vec<SkipTypeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub vars: Vec<(String, String)>,
    pub modules: Vec<ModuleEntry>,
}

impl Manifest {
    /// Build the manifest for already-filtered projects and their shielded types.
    ///
    /// Modules keep the order of `projects`; skip types are sorted.
    pub fn assemble<'a, I>(settings: &ManifestSettings, projects: I) -> Self
    where
        I: IntoIterator<Item = (&'a ProjectDescriptor, &'a BTreeSet<String>)>,
    {
        let mut vars = vec![
            (IN_PATH_VAR.to_string(), settings.in_path.clone()),
            (OUT_PATH_VAR.to_string(), settings.out_path.clone()),
            (
                LOG_FILE_VAR.to_string(),
                format!("$({OUT_PATH_VAR}){MAIN_SEPARATOR}{}", settings.log_file),
            ),
        ];
        vars.extend(
            settings
                .flags
                .as_vars()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );

        let modules = projects
            .into_iter()
            .map(|(project, shielded)| ModuleEntry {
                project: project.name().to_string(),
                file: format!(
                    "$({IN_PATH_VAR}){MAIN_SEPARATOR}{}{}",
                    project.name(),
                    settings.binary_suffix
                ),
                skip_types: shielded.iter().map(SkipTypeEntry::new).collect(),
            })
            .collect();

        Self { vars, modules }
    }

    pub fn skip_type_count(&self) -> usize {
        self.modules.iter().map(|m| m.skip_types.len()).sum()
    }

    /// Render the manifest as an XML document.
    pub fn render(&self) -> Result<String> {
        self.write_xml().map_err(|err| {
            Error::new(ErrorKind::SerializationFailed, err.to_string())
                .with_operation("manifest::render")
                .set_source(err)
        })
    }

    fn write_xml(&self) -> std::result::Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        writeln!(out, "<Obfuscator>")?;
        for (name, value) in &self.vars {
            writeln!(
                out,
                r#"  <Var name="{}" value="{}" />"#,
                escape_attr(name),
                escape_attr(value)
            )?;
        }
        for module in &self.modules {
            if module.skip_types.is_empty() {
                writeln!(out, r#"  <Module file="{}" />"#, escape_attr(&module.file))?;
                continue;
            }
            writeln!(out, r#"  <Module file="{}">"#, escape_attr(&module.file))?;
            for skip in &module.skip_types {
                writeln!(
                    out,
                    r#"    <SkipType name="{}" skipFields="{}" skipProperties="{}" />"#,
                    escape_attr(&skip.name),
                    skip.skip_fields,
                    skip.skip_properties
                )?;
            }
            writeln!(out, "  </Module>")?;
        }
        writeln!(out, "</Obfuscator>")?;
        Ok(out)
    }
}

/// Escape a value for use inside a double-quoted XML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shielded(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_assemble_orders_vars_and_modules() {
        let settings = ManifestSettings::new("/build/in", "/build/out");
        let shell = ProjectDescriptor::new("/src/Shell/Shell.csproj", "Shell");
        let core = ProjectDescriptor::new("/src/Core/Core.csproj", "Core");
        let shell_types = shielded(&["Shell.Views.Main", "Shell.App"]);
        let core_types = BTreeSet::new();

        let manifest = Manifest::assemble(&settings, [(&shell, &shell_types), (&core, &core_types)]);

        let var_names: Vec<_> = manifest.vars.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            var_names,
            vec![
                "InPath",
                "OutPath",
                "LogFile",
                "KeepPublicApi",
                "HidePrivateApi",
                "RenameProperties",
                "RenameEvents",
                "RenameFields",
                "HideStrings",
            ]
        );
        assert_eq!(manifest.vars[2].1, format!("$(OutPath){MAIN_SEPARATOR}Mapping.txt"));
        assert_eq!(manifest.modules.len(), 2);
        assert_eq!(manifest.modules[0].file, format!("$(InPath){MAIN_SEPARATOR}Shell.dll"));
        assert_eq!(
            manifest.modules[0].skip_types,
            vec![SkipTypeEntry::new("Shell.App"), SkipTypeEntry::new("Shell.Views.Main")]
        );
        assert!(manifest.modules[1].skip_types.is_empty());
        assert_eq!(manifest.skip_type_count(), 2);
    }

    #[test]
    fn test_render_document() {
        let settings = ManifestSettings::new("C:\\in", "C:\\out").with_binary_suffix(".exe");
        let app = ProjectDescriptor::new("/src/App/App.csproj", "App");
        let types = shielded(&["App.MainWindow"]);

        let xml = Manifest::assemble(&settings, [(&app, &types)]).render().unwrap();
        let sep = MAIN_SEPARATOR;
        let expected = format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<Obfuscator>
  <Var name="InPath" value="C:\in" />
  <Var name="OutPath" value="C:\out" />
  <Var name="LogFile" value="$(OutPath){sep}Mapping.txt" />
  <Var name="KeepPublicApi" value="false" />
  <Var name="HidePrivateApi" value="true" />
  <Var name="RenameProperties" value="true" />
  <Var name="RenameEvents" value="true" />
  <Var name="RenameFields" value="true" />
  <Var name="HideStrings" value="true" />
  <Module file="$(InPath){sep}App.exe">
    <SkipType name="App.MainWindow" skipFields="true" skipProperties="true" />
  </Module>
</Obfuscator>
"#
        );
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_render_escapes_attributes() {
        let settings = ManifestSettings::new("/in & \"out\"", "/out");
        let xml = Manifest::assemble(&settings, std::iter::empty()).render().unwrap();
        assert!(xml.contains(r#"value="/in &amp; &quot;out&quot;""#));
        assert!(xml.ends_with("</Obfuscator>\n"));
    }

    #[test]
    fn test_rendered_manifest_is_well_formed() {
        let settings = ManifestSettings::new("/in", "/out");
        let app = ProjectDescriptor::new("/src/App/App.csproj", "App<1>");
        let types = shielded(&["App.Views.Main"]);
        let xml = Manifest::assemble(&settings, [(&app, &types)]).render().unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let skip = doc
            .descendants()
            .find(|n| n.has_tag_name("SkipType"))
            .unwrap();
        assert_eq!(skip.attribute("name"), Some("App.Views.Main"));
        assert_eq!(skip.attribute("skipProperties"), Some("true"));
    }
}

//! In-memory record of one project descriptor.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use shieldgen_error::{Error, Result};

use crate::document::DescriptorDocument;
use crate::paths::{has_extension, resolve_reference};

/// Extension that identifies a project descriptor.
pub const PROJECT_EXTENSION: &str = "csproj";

/// Extension of UI markup files.
pub const MARKUP_EXTENSION: &str = "xaml";

const ASSEMBLY_NAME_TAG: &str = "AssemblyName";
const ROOT_NAMESPACE_TAG: &str = "RootNamespace";
const REFERENCE_TAG: &str = "ProjectReference";
const REFERENCE_PATH_ATTR: &str = "Include";

/// Fields that name the target runtime, old-style first.
const TARGET_FRAMEWORK_TAGS: &[&str] = &[
    "TargetFrameworkVersion",
    "TargetFramework",
    "TargetFrameworks",
];

/// Substrings marking a .NET Framework 4.x target (`v4.7.2`, `net48`).
const LEGACY_RUNTIME_MARKERS: &[&str] = &["v4", "net4"];

/// Whether `path` names a project descriptor, judged by extension only.
pub fn is_project_path(path: &Path) -> bool {
    has_extension(path, PROJECT_EXTENSION)
}

/// Identity and markup inventory of one project.
///
/// Built once per canonical path during graph resolution and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    path: PathBuf,
    name: String,
    namespace: String,
    is_legacy_runtime_target: bool,
    markup_files: Vec<PathBuf>,
    references: Vec<PathBuf>,
}

impl ProjectDescriptor {
    /// Create a descriptor whose namespace defaults to its name.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: path.into(),
            namespace: name.clone(),
            name,
            is_legacy_runtime_target: false,
            markup_files: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_legacy_runtime_target(mut self, legacy: bool) -> Self {
        self.is_legacy_runtime_target = legacy;
        self
    }

    pub fn with_markup_files(mut self, markup_files: Vec<PathBuf>) -> Self {
        self.markup_files = markup_files;
        self
    }

    pub fn with_references(mut self, references: Vec<PathBuf>) -> Self {
        self.references = references;
        self
    }

    /// Read the descriptor at `path` (already canonical) and inventory its markup.
    pub fn load(path: &Path) -> Result<Self> {
        let doc = DescriptorDocument::load(path).map_err(|e| e.with_operation("descriptor::load"))?;
        let descriptor = Self::from_document(path, &doc)
            .with_markup_files(list_markup_files(path)?);
        debug!(
            path = %path.display(),
            name = descriptor.name(),
            markup = descriptor.markup_files().len(),
            references = descriptor.references().len(),
            "loaded descriptor"
        );
        Ok(descriptor)
    }

    /// Derive identity fields and references from a parsed document.
    ///
    /// Markup files are not listed here; see [`ProjectDescriptor::load`].
    pub fn from_document(path: &Path, doc: &DescriptorDocument) -> Self {
        let name = doc
            .first_text(ASSEMBLY_NAME_TAG)
            .map(str::to_string)
            .unwrap_or_else(|| file_stem(path));
        let namespace = doc
            .first_text(ROOT_NAMESPACE_TAG)
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());
        let is_legacy = TARGET_FRAMEWORK_TAGS
            .iter()
            .filter_map(|tag| doc.first_text(tag))
            .any(is_legacy_runtime);

        Self::new(path, name)
            .with_namespace(namespace)
            .with_legacy_runtime_target(is_legacy)
            .with_references(reference_paths(path, doc))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_legacy_runtime_target(&self) -> bool {
        self.is_legacy_runtime_target
    }

    pub fn markup_files(&self) -> &[PathBuf] {
        &self.markup_files
    }

    /// Canonical paths of the descriptors this one references, in declaration order.
    pub fn references(&self) -> &[PathBuf] {
        &self.references
    }
}

/// `true` if a target-framework value names a legacy runtime.
pub fn is_legacy_runtime(target: &str) -> bool {
    let target = target.to_ascii_lowercase();
    LEGACY_RUNTIME_MARKERS
        .iter()
        .any(|marker| target.contains(marker))
}

/// Resolved reference targets declared by the document at `path`.
pub fn reference_paths(path: &Path, doc: &DescriptorDocument) -> Vec<PathBuf> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    doc.attribute_values(REFERENCE_TAG, REFERENCE_PATH_ATTR)
        .into_iter()
        .filter(|include| !include.trim().is_empty())
        .map(|include| resolve_reference(base_dir, include))
        .collect()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// All markup files under the descriptor's directory, sorted by path.
fn list_markup_files(descriptor: &Path) -> Result<Vec<PathBuf>> {
    let Some(root) = descriptor.parent() else {
        return Ok(Vec::new());
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            Error::traversal_failed(root, format!("failed to walk directory: {err}"))
                .with_operation("descriptor::list_markup_files")
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), MARKUP_EXTENSION) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(text: &str) -> DescriptorDocument {
        DescriptorDocument::parse(text).unwrap()
    }

    #[test]
    fn test_name_falls_back_to_file_stem() {
        let doc = parse("<Project><PropertyGroup /></Project>");
        let d = ProjectDescriptor::from_document(Path::new("/src/Shell/Shell.App.csproj"), &doc);
        assert_eq!(d.name(), "Shell.App");
        assert_eq!(d.namespace(), "Shell.App");
        assert!(!d.is_legacy_runtime_target());
    }

    #[test]
    fn test_explicit_fields_win() {
        let doc = parse(
            r#"<Project>
  <PropertyGroup>
    <AssemblyName>Contoso.Shell</AssemblyName>
    <RootNamespace>Contoso.Shell.Ui</RootNamespace>
  </PropertyGroup>
</Project>"#,
        );
        let d = ProjectDescriptor::from_document(Path::new("/src/Shell/Shell.csproj"), &doc);
        assert_eq!(d.name(), "Contoso.Shell");
        assert_eq!(d.namespace(), "Contoso.Shell.Ui");
    }

    #[test]
    fn test_namespace_defaults_to_assembly_name() {
        let doc = parse("<Project><PropertyGroup><AssemblyName>Tools</AssemblyName></PropertyGroup></Project>");
        let d = ProjectDescriptor::from_document(Path::new("/src/T/T.csproj"), &doc);
        assert_eq!(d.namespace(), "Tools");
    }

    #[test]
    fn test_legacy_runtime_markers() {
        assert!(is_legacy_runtime("v4.7.2"));
        assert!(is_legacy_runtime("net48"));
        assert!(is_legacy_runtime("net8.0;net472"));
        assert!(!is_legacy_runtime("net8.0-windows"));
        assert!(!is_legacy_runtime("netstandard2.0"));

        let doc = parse("<Project><PropertyGroup><TargetFrameworkVersion>v4.6.1</TargetFrameworkVersion></PropertyGroup></Project>");
        let d = ProjectDescriptor::from_document(Path::new("/src/Old/Old.csproj"), &doc);
        assert!(d.is_legacy_runtime_target());
    }

    #[test]
    fn test_load_lists_markup_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Shell");
        fs::create_dir_all(root.join("Views/Dialogs")).unwrap();
        fs::write(root.join("Shell.csproj"), "<Project />").unwrap();
        fs::write(root.join("App.xaml"), "<Application />").unwrap();
        fs::write(root.join("Views/Main.xaml"), "<Window />").unwrap();
        fs::write(root.join("Views/Dialogs/About.XAML"), "<Window />").unwrap();
        fs::write(root.join("Views/Main.xaml.cs"), "class Main {}").unwrap();

        let d = ProjectDescriptor::load(&root.join("Shell.csproj")).unwrap();
        let names: Vec<_> = d
            .markup_files()
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("App.xaml"),
                PathBuf::from("Views/Dialogs/About.XAML"),
                PathBuf::from("Views/Main.xaml"),
            ]
        );
    }

    #[test]
    fn test_load_malformed_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Broken.csproj");
        fs::write(&path, "<Project><PropertyGroup>").unwrap();

        let err = ProjectDescriptor::load(&path).unwrap_err();
        assert_eq!(err.kind(), shieldgen_error::ErrorKind::MalformedDescriptor);
        assert_eq!(err.context_value("path"), Some(path.display().to_string().as_str()));
    }
}

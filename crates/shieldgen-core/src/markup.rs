//! Recover type names that UI markup binds to by string.
//!
//! This is a line-oriented pattern heuristic, not a parser. Declarations that
//! span several lines (a `class` keyword on one line and its name on the next,
//! an `xmlns` attribute broken across lines) are not recognised.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use shieldgen_error::{Error, ErrorKind, Result};

use crate::descriptor::ProjectDescriptor;
use crate::paths::try_read_text;

/// Suffix appended to a markup path to get its code-behind (`View.xaml` -> `View.xaml.cs`).
pub const CODE_BEHIND_SUFFIX: &str = ".cs";

/// Namespaces owned by the platform; never user code, never shielded.
pub const FRAMEWORK_NAMESPACE_PREFIXES: &[&str] = &["System", "Microsoft"];

/// Alias token -> CLR namespace, scoped to one markup file.
pub type AliasTable = HashMap<String, String>;

static NAMESPACE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*namespace\s+([A-Za-z_][\w.]*)").expect("namespace pattern")
});

/// A class declaration at the start of a line or after `{` / `;` on the same line.
static CLASS_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[{;])\s*(?:\[[^\]]*\]\s*)*(?:(?:public|internal|private|protected|sealed|static|abstract|partial|unsafe|new|file|record)\s+)*class\s+([A-Za-z_]\w*)",
    )
    .expect("class pattern")
});

static ALIAS_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"xmlns:([A-Za-z_][\w.\-]*)\s*=\s*(?:"clr-namespace:([^";]*)|'clr-namespace:([^';]*))"#,
    )
    .expect("alias pattern")
});

/// `prefix:Identifier`, where the prefix is not glued to a longer name.
static ALIAS_USAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w.\-])([A-Za-z_][\w.\-]*):([A-Za-z_]\w*)").expect("usage pattern")
});

/// Scans markup files and their code-behind for string-bound type names.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupTypeExtractor;

impl MarkupTypeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Shielded types for every markup file of `project`, deduplicated and sorted.
    pub fn extract_project(&self, project: &ProjectDescriptor) -> Result<BTreeSet<String>> {
        let mut shielded = BTreeSet::new();
        for markup in project.markup_files() {
            shielded.extend(self.extract_file(markup)?);
        }
        debug!(
            project = project.name(),
            markup = project.markup_files().len(),
            shielded = shielded.len(),
            "extracted shielded types"
        );
        Ok(shielded)
    }

    /// Shielded types contributed by one markup file and its code-behind.
    ///
    /// A markup file that vanished since it was listed contributes nothing.
    /// Any other read failure propagates with the failing path.
    pub fn extract_file(&self, markup: &Path) -> Result<BTreeSet<String>> {
        let mut shielded = BTreeSet::new();

        match self.scan_code_behind(&code_behind_path(markup)) {
            Ok(types) => shielded.extend(types),
            Err(err) if err.kind() == ErrorKind::MissingPairedFile => {
                debug!(markup = %markup.display(), "no code-behind");
            }
            Err(err) => return Err(err.with_operation("markup::extract_file")),
        }

        let text = match try_read_text(markup) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(markup = %markup.display(), "markup file disappeared, skipping");
                return Ok(shielded);
            }
            Err(err) => {
                return Err(Error::io(err, markup).with_operation("markup::extract_file"));
            }
        };

        let aliases = self.collect_aliases(&text);
        shielded.extend(self.scan_usages(&text, &aliases));
        Ok(shielded)
    }

    /// Scan a code-behind file. A missing file is `MissingPairedFile`.
    pub fn scan_code_behind(&self, path: &Path) -> Result<Vec<String>> {
        match try_read_text(path) {
            Ok(text) => Ok(self.scan_code_behind_text(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(Error::missing_paired_file(path).set_source(err))
            }
            Err(err) => Err(Error::io(err, path).with_operation("markup::scan_code_behind")),
        }
    }

    /// `namespace.Class` for every class declared after a namespace line.
    ///
    /// Classes before the first namespace line are dropped.
    pub fn scan_code_behind_text(&self, text: &str) -> Vec<String> {
        let mut active_namespace: Option<&str> = None;
        let mut types = Vec::new();
        for line in text.lines() {
            if let Some(caps) = NAMESPACE_DECL.captures(line) {
                active_namespace = caps.get(1).map(|m| m.as_str());
            }
            let Some(namespace) = active_namespace else {
                continue;
            };
            for caps in CLASS_DECL.captures_iter(line) {
                types.push(format!("{namespace}.{}", &caps[1]));
            }
        }
        types
    }

    /// `xmlns:alias="clr-namespace:..."` declarations, minus framework namespaces.
    ///
    /// A redeclared alias keeps the last declaration.
    pub fn collect_aliases(&self, text: &str) -> AliasTable {
        let mut aliases = AliasTable::new();
        for line in text.lines() {
            for caps in ALIAS_DECL.captures_iter(line) {
                let alias = &caps[1];
                let Some(namespace) = caps.get(2).or_else(|| caps.get(3)) else {
                    continue;
                };
                let namespace = namespace.as_str().trim();
                if namespace.is_empty() || is_framework_namespace(namespace) {
                    continue;
                }
                aliases.insert(alias.to_string(), namespace.to_string());
            }
        }
        aliases
    }

    /// `namespace.Identifier` for every `alias:Identifier` with a known alias.
    pub fn scan_usages(&self, text: &str, aliases: &AliasTable) -> Vec<String> {
        if aliases.is_empty() {
            return Vec::new();
        }
        let mut types = Vec::new();
        for line in text.lines() {
            for caps in ALIAS_USAGE.captures_iter(line) {
                if let Some(namespace) = aliases.get(&caps[1]) {
                    types.push(format!("{namespace}.{}", &caps[2]));
                }
            }
        }
        types
    }
}

/// The code-behind paired with `markup`.
pub fn code_behind_path(markup: &Path) -> PathBuf {
    let mut path = markup.as_os_str().to_os_string();
    path.push(CODE_BEHIND_SUFFIX);
    PathBuf::from(path)
}

pub fn is_framework_namespace(namespace: &str) -> bool {
    FRAMEWORK_NAMESPACE_PREFIXES
        .iter()
        .any(|prefix| namespace.starts_with(prefix))
}

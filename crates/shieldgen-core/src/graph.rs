//! Project-reference graph resolution.
//!
//! Resolution is two independent walks over the same reference structure:
//!
//! 1. [`discover`] loads every project descriptor reachable from the entry,
//!    stopping at anything that is not a project descriptor.
//! 2. [`invalidation_flags`] re-walks from the entry and marks every node that
//!    sits on or below a non-project node as dirty. The mark is inherited by
//!    the whole branch, even by nodes that carry the project extension.
//!
//! [`resolve_with`] drops dirty paths from the discovered set. Both walks keep
//! their own visited set, so cycles, self references and diamonds terminate
//! and each node is processed once.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use shieldgen_error::{Error, Result};

use crate::descriptor::{ProjectDescriptor, is_project_path, reference_paths};
use crate::document::DescriptorDocument;
use crate::paths::canonical_key;

/// Where the resolver gets nodes and edges from.
pub trait ReferenceSource {
    /// Whether `path` identifies a project descriptor.
    fn is_project(&self, path: &Path) -> bool;

    /// Build the descriptor for a project node. Its references are the node's edges.
    fn load(&self, path: &Path) -> Result<ProjectDescriptor>;

    /// Outgoing references of any node, project or not.
    fn references(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// [`ReferenceSource`] backed by descriptor files on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReferenceSource;

impl ReferenceSource for FsReferenceSource {
    fn is_project(&self, path: &Path) -> bool {
        is_project_path(path)
    }

    fn load(&self, path: &Path) -> Result<ProjectDescriptor> {
        ProjectDescriptor::load(path)
    }

    fn references(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let doc = DescriptorDocument::load(path)?;
        Ok(reference_paths(path, &doc))
    }
}

/// Pass 1: every project descriptor reachable from `entry`, keyed by path.
pub fn discover<S: ReferenceSource + ?Sized>(
    source: &S,
    entry: &Path,
) -> Result<BTreeMap<PathBuf, ProjectDescriptor>> {
    let mut visited = BTreeMap::new();
    discover_from(source, entry, &mut visited)?;
    Ok(visited)
}

fn discover_from<S: ReferenceSource + ?Sized>(
    source: &S,
    path: &Path,
    visited: &mut BTreeMap<PathBuf, ProjectDescriptor>,
) -> Result<()> {
    if !source.is_project(path) {
        debug!(path = %path.display(), "skipping non-project reference");
        return Ok(());
    }
    if visited.contains_key(path) {
        return Ok(());
    }

    let descriptor = source
        .load(path)
        .map_err(|e| e.with_operation("graph::discover"))?;
    let references = descriptor.references().to_vec();
    visited.insert(path.to_path_buf(), descriptor);

    for reference in &references {
        discover_from(source, reference, visited)?;
    }
    Ok(())
}

/// Pass 2: the `should_clean` flag of every node reachable from `entry`.
///
/// A node is dirty if it is not a project or if the branch it was first
/// reached through is dirty. The first flag assigned to a path is final.
/// Edges of non-project nodes are read best-effort; every project descriptor
/// must load, whichever flag it inherited.
pub fn invalidation_flags<S: ReferenceSource + ?Sized>(
    source: &S,
    entry: &Path,
) -> Result<HashMap<PathBuf, bool>> {
    let mut flags = HashMap::new();
    flag_from(source, entry, false, &mut flags)?;
    Ok(flags)
}

fn flag_from<S: ReferenceSource + ?Sized>(
    source: &S,
    path: &Path,
    inherited: bool,
    flags: &mut HashMap<PathBuf, bool>,
) -> Result<()> {
    if flags.contains_key(path) {
        return Ok(());
    }

    let is_project = source.is_project(path);
    let should_clean = inherited || !is_project;
    flags.insert(path.to_path_buf(), should_clean);

    let references = if !is_project {
        source.references(path).unwrap_or_else(|err| {
            debug!(path = %path.display(), error = %err, "no readable references on non-project node");
            Vec::new()
        })
    } else {
        source
            .references(path)
            .map_err(|e| e.with_operation("graph::invalidation_flags"))?
    };

    for reference in &references {
        flag_from(source, reference, should_clean, flags)?;
    }
    Ok(())
}

/// Resolve the project set reachable from `entry` through `source`.
///
/// The result is sorted by name, then path.
pub fn resolve_with<S: ReferenceSource + ?Sized>(
    source: &S,
    entry: &Path,
) -> Result<Vec<ProjectDescriptor>> {
    let mut visited = discover(source, entry)?;
    let flags = invalidation_flags(source, entry)?;

    let dirty: Vec<PathBuf> = visited
        .keys()
        .filter(|path| flags.get(*path).copied().unwrap_or(false))
        .cloned()
        .collect();
    for path in &dirty {
        debug!(path = %path.display(), "pruning project reached through a non-project node");
        visited.remove(path);
    }

    let mut projects: Vec<ProjectDescriptor> = visited.into_values().collect();
    projects.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.path().cmp(b.path())));
    Ok(projects)
}

/// Resolve the project set reachable from the descriptor file at `entry`.
pub fn resolve_projects(entry: &Path) -> Result<Vec<ProjectDescriptor>> {
    let start = Instant::now();
    if !entry.is_file() {
        return Err(Error::file_not_found(entry).with_operation("graph::resolve_projects"));
    }
    let entry = canonical_key(entry);
    let projects = resolve_with(&FsReferenceSource, &entry)?;
    info!(
        "Project resolution: {:.2}s ({} projects)",
        start.elapsed().as_secs_f64(),
        projects.len()
    );
    Ok(projects)
}

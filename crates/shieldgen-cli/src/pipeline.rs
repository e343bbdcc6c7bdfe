//! Core processing pipeline: validate entry → resolve graph → filter → extract → assemble.

use std::collections::BTreeSet;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use shieldgen_core::{
    ExclusionReason, Inclusion, Manifest, MarkupTypeExtractor, ProjectDescriptor, Result,
    resolve_projects,
};

use crate::ShieldgenOptions;
use crate::entry::validate_entry;

/// What one run produced, for output and the summary line.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Projects that survived graph resolution.
    pub resolved: usize,
    /// Included project names with their shielded-type counts, in manifest order.
    pub included: Vec<(String, usize)>,
    pub excluded: Vec<(String, ExclusionReason)>,
    pub manifest: Manifest,
}

/// Run the whole pipeline for `opts`.
///
/// 1. Validate the entry project
/// 2. Resolve the project-reference graph
/// 3. Apply the inclusion policy
/// 4. Extract shielded types per included project
/// 5. Assemble the manifest
pub fn process_project_graph(opts: &ShieldgenOptions) -> Result<RunReport> {
    let entry = validate_entry(&opts.project)?;

    let projects = resolve_projects(&entry)?;
    let resolved = projects.len();

    let (included, excluded) = partition(opts, projects);
    for (name, reason) in &excluded {
        info!(project = %name, %reason, "project excluded");
    }

    let extract_start = Instant::now();
    let shielded = extract_all(&included, opts.parallel)?;
    info!(
        "Shielded type extraction: {:.2}s ({} projects)",
        extract_start.elapsed().as_secs_f64(),
        included.len()
    );

    let manifest = Manifest::assemble(&opts.manifest, included.iter().zip(shielded.iter()));
    let included = included
        .iter()
        .zip(shielded.iter())
        .map(|(project, types)| (project.name().to_string(), types.len()))
        .collect();

    Ok(RunReport {
        resolved,
        included,
        excluded,
        manifest,
    })
}

fn partition(
    opts: &ShieldgenOptions,
    projects: Vec<ProjectDescriptor>,
) -> (Vec<ProjectDescriptor>, Vec<(String, ExclusionReason)>) {
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    for project in projects {
        match opts.policy.decide(&project) {
            Inclusion::Included => included.push(project),
            Inclusion::Excluded(reason) => excluded.push((project.name().to_string(), reason)),
        }
    }
    (included, excluded)
}

/// Shielded types per project, in the same order as `projects`.
fn extract_all(projects: &[ProjectDescriptor], parallel: bool) -> Result<Vec<BTreeSet<String>>> {
    let extractor = MarkupTypeExtractor::new();
    if parallel {
        projects
            .par_iter()
            .map(|project| extractor.extract_project(project))
            .collect()
    } else {
        projects
            .iter()
            .map(|project| extractor.extract_project(project))
            .collect()
    }
}

//! Core of shieldgen: project-graph resolution, markup type extraction and
//! manifest assembly.

pub mod descriptor;
pub mod document;
pub mod graph;
pub mod manifest;
pub mod markup;
pub mod paths;
pub mod policy;

pub use descriptor::{MARKUP_EXTENSION, PROJECT_EXTENSION, ProjectDescriptor, is_project_path};
pub use document::DescriptorDocument;
pub use graph::{FsReferenceSource, ReferenceSource, resolve_projects, resolve_with};
pub use manifest::{Manifest, ManifestFlags, ManifestSettings, ModuleEntry, SkipTypeEntry};
pub use markup::MarkupTypeExtractor;
pub use policy::{ExclusionReason, Inclusion, InclusionPolicy, parse_name_list};
pub use shieldgen_error::{Error, ErrorKind, Result};

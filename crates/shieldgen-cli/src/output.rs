//! Output generation (manifest file or stdout, run summary).

use std::fmt::Write;
use std::fs;
use std::path::Path;

use tracing::info;

use shieldgen_core::Result;
use shieldgen_error::Error;

use crate::pipeline::RunReport;

/// Write the rendered manifest to `path`, creating parent directories.
pub fn write_manifest(path: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| Error::io(err, parent).with_operation("output::write_manifest"))?;
    }
    fs::write(path, rendered)
        .map_err(|err| Error::io(err, path).with_operation("output::write_manifest"))?;
    info!(path = %path.display(), "manifest written");
    Ok(())
}

/// One-paragraph summary of a run, for stderr.
pub fn summarize(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Resolved {} projects: {} included, {} excluded, {} shielded types",
        report.resolved,
        report.included.len(),
        report.excluded.len(),
        report.manifest.skip_type_count()
    );
    for (name, count) in &report.included {
        let _ = writeln!(out, "  + {name} ({count} shielded)");
    }
    for (name, reason) in &report.excluded {
        let _ = writeln!(out, "  - {name} ({reason})");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shieldgen_core::{ExclusionReason, Manifest, ManifestSettings};

    #[test]
    fn test_summarize() {
        let report = RunReport {
            resolved: 3,
            included: vec![("Shell".to_string(), 0), ("Core".to_string(), 0)],
            excluded: vec![("Legacy".to_string(), ExclusionReason::LegacyRuntime)],
            manifest: Manifest::assemble(&ManifestSettings::new("in", "out"), std::iter::empty()),
        };
        let summary = summarize(&report);
        assert!(summary.starts_with("Resolved 3 projects: 2 included, 1 excluded, 0 shielded types"));
        assert!(summary.contains("  + Shell (0 shielded)"));
        assert!(summary.contains("  - Legacy (legacy runtime target)"));
    }

    #[test]
    fn test_write_manifest_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/obfuscar.xml");
        write_manifest(&path, "<Obfuscator />\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<Obfuscator />\n");
    }
}

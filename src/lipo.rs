//! Universal-binary assembly via lipo.
//!
//! Merges single-architecture dylibs into one fat binary, re-ids it, and
//! rewrites third-party load paths across every merged architecture slice.
//! System load paths are never rewritten.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::DepError;
use crate::otool::Otool;
use crate::process::Cmd;
use crate::rewrite;

/// One architecture's input to a merge: (arch name, source dylib path).
pub type ArchSource = (String, String);

/// Combine single-architecture dylibs into one fat binary at `target`.
pub fn merge_architectures(sources: &[ArchSource], target: &Path) -> Result<(), DepError> {
    let mut cmd = Cmd::new("lipo").arg("-create");
    for (arch, source) in sources {
        cmd = cmd.arg("-arch").arg(arch).arg(source);
    }
    cmd.arg("-output").arg(target.to_string_lossy()).run()?;
    Ok(())
}

/// Merge `sources` into `target`, then apply `replacements` to its
/// third-party load paths.
///
/// Each `(old, new)` replacement applies to any third-party load path that
/// contains `old` as a substring, so partial paths work. Dependencies are
/// gathered per merged architecture, since slices can disagree.
pub fn universalize(
    sources: &[ArchSource],
    replacements: &[(String, String)],
    target: &Path,
) -> Result<(), DepError> {
    merge_architectures(sources, target)?;

    // The merged file's own install name still points at one of the inputs.
    rewrite::set_install_name(&target.to_string_lossy(), target)?;

    let mut third_party = BTreeSet::new();
    for (arch, _) in sources {
        let listing = Otool::with_arch(arch.clone()).listing(&target.to_string_lossy())?;
        third_party.extend(
            listing
                .third_party_deps()
                .iter()
                .map(|dep| dep.to_string()),
        );
    }

    for (old, new) in replacements {
        for dep in &third_party {
            if dep.contains(old.as_str()) {
                let rewritten = dep.replace(old.as_str(), new);
                rewrite::change_load_path(dep, &rewritten, target)?;
            }
        }
    }

    Ok(())
}

//! Frameworkize command - converts dylibs into framework bundles.
//!
//! Resolves the transitive third-party closure of the seed libraries, then
//! invokes `rtool` once per library to build a framework bundle, handing it
//! the full old-path -> framework-path mapping so every cross-library load
//! path gets rewritten to the relocated layout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::closure::resolve_closure;
use crate::naming::{self, FrameworkIdentity};
use crate::otool::Otool;
use crate::process;
use crate::rewrite;

use super::require_tool;

/// Execute the frameworkize command.
pub fn cmd_frameworkize(
    libraries: &[String],
    output_dir: &Path,
    frameworks_root: &str,
) -> Result<()> {
    require_tool("otool")?;
    require_tool("rtool")?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let otool = Otool::new();
    let resolved = resolve_closure(&otool, libraries)?;
    // BTreeSet iteration gives the sorted order downstream tooling expects.
    let libs_to_convert: Vec<String> = resolved.into_iter().collect();
    println!("Resolved {} libraries to convert", libs_to_convert.len());

    // Unrecognized names abort before any framework is built.
    let identities: Vec<FrameworkIdentity> = libs_to_convert
        .iter()
        .map(|lib| naming::framework_identity(lib).map_err(Into::into))
        .collect::<Result<_>>()?;

    let new_paths: Vec<String> = identities
        .iter()
        .map(|id| rewrite::framework_install_path(frameworks_root, id))
        .collect();
    let rlinks = format!(
        "--rlinks_framework=[{}]:[{}]",
        libs_to_convert.join(" "),
        new_paths.join(" ")
    );

    for (lib, identity) in libs_to_convert.iter().zip(&identities) {
        println!("{} -> {}.framework/Versions/{}", lib, identity.name, identity.version);
        process::run(
            "rtool",
            [
                format!("--framework_root={frameworks_root}"),
                format!("--framework_name={}", identity.name),
                format!("--framework_version={}", identity.version),
                format!("--library={lib}"),
                format!("--builddir={}", output_dir.display()),
                format!("--headers={}", header_files(lib, identity)),
                "--headers_no_root".to_string(),
                rlinks.clone(),
            ],
        )?;
    }

    collect_frameworks(output_dir)?;
    Ok(())
}

/// Space-joined header file list for a library, from the conventional
/// `<libdir>/include/<name>[-<version>]` directory. Empty when the directory
/// doesn't exist; unversioned libraries have no suffixed header dir.
fn header_files(library_path: &str, identity: &FrameworkIdentity) -> String {
    let lib_dir = match library_path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => return String::new(),
    };
    let mut header_dir = format!("{}/include/{}", lib_dir, identity.name);
    if !identity.version.is_empty() && identity.version != naming::UNVERSIONED {
        header_dir.push('-');
        header_dir.push_str(&identity.version);
    }

    let entries = match fs::read_dir(&header_dir) {
        Ok(entries) => entries,
        Err(_) => return String::new(),
    };
    let mut headers: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| format!("{}/{}", header_dir, entry.file_name().to_string_lossy()))
        .collect();
    headers.sort();
    headers.join(" ")
}

/// Move each built `*.framework` out of its `*.frwkproj` staging directory
/// into `output_dir`, replacing stale copies, then remove the staging dirs.
fn collect_frameworks(output_dir: &Path) -> Result<()> {
    for staging in dir_entries_with_suffix(output_dir, ".frwkproj")? {
        for framework in dir_entries_with_suffix(&staging, ".framework")? {
            let dest = output_dir.join(framework.file_name().unwrap_or_default());
            if dest.exists() {
                fs::remove_dir_all(&dest)
                    .with_context(|| format!("failed to remove stale {}", dest.display()))?;
            }
            fs::rename(&framework, &dest).with_context(|| {
                format!(
                    "failed to move {} to {}",
                    framework.display(),
                    dest.display()
                )
            })?;
        }
        fs::remove_dir_all(&staging)
            .with_context(|| format!("failed to remove staging dir {}", staging.display()))?;
    }
    Ok(())
}

fn dir_entries_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches)
}

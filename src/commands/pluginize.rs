//! Pluginize command - rewrites plugin load paths.
//!
//! Plugins (`.so` bundles) reference third-party dylibs by their build-time
//! paths. Dependencies covered by a known framework get pointed at the
//! relocated framework bundle; everything else is assumed to travel with the
//! plugins and has the plugins directory prefix swapped for the relocated
//! plugins root.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::naming;
use crate::otool::Otool;
use crate::rewrite;

use super::require_tool;

/// Explicit inputs for a pluginize run. The known-frameworks set and roots
/// are parameters rather than ambient working-directory lookups.
#[derive(Debug, Clone)]
pub struct PluginizeConfig {
    /// Directory containing the `.so` plugin bundles to rewrite.
    pub plugins_dir: PathBuf,
    /// Run-time root recorded for relocated frameworks.
    pub frameworks_root: String,
    /// Run-time root that replaces `plugins_dir` in non-framework load paths.
    pub relocated_plugins_root: String,
    /// Names of frameworks the application bundle already ships.
    pub known_frameworks: BTreeSet<String>,
}

/// Execute the pluginize command.
pub fn cmd_pluginize(config: &PluginizeConfig) -> Result<()> {
    require_tool("otool")?;
    require_tool("install_name_tool")?;

    let otool = Otool::new();
    let plugins_prefix = config.plugins_dir.to_string_lossy().into_owned();

    for plugin in plugin_bundles(&config.plugins_dir)? {
        let listing = otool.listing(&plugin.to_string_lossy())?;
        let mut deps: Vec<String> = listing
            .third_party_deps()
            .iter()
            .map(|dep| dep.to_string())
            .collect();
        deps.sort();
        deps.dedup();

        println!("{}: {} third-party load paths", plugin.display(), deps.len());
        for dep in deps {
            let new_path = if matches_known_framework(&dep, &config.known_frameworks) {
                let identity = naming::framework_identity(&dep)?;
                rewrite::framework_install_path(&config.frameworks_root, &identity)
            } else {
                dep.replace(&plugins_prefix, &config.relocated_plugins_root)
            };
            rewrite::change_load_path(&dep, &new_path, &plugin)?;
        }
    }
    Ok(())
}

/// Derive known framework names from a sources directory: each `*.subproj`
/// entry names one framework.
pub fn known_frameworks_from_sources(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if let Some(name) = file_name.strip_suffix(".subproj") {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}

/// A dependency belongs to a known framework when its path contains the
/// framework name followed by a version separator (`<name>-` or `<name>.`).
fn matches_known_framework(dep: &str, known: &BTreeSet<String>) -> bool {
    known
        .iter()
        .any(|name| dep.contains(&format!("{name}-")) || dep.contains(&format!("{name}.")))
}

fn plugin_bundles(plugins_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut plugins = Vec::new();
    let entries = fs::read_dir(plugins_dir)
        .with_context(|| format!("failed to read plugins dir {}", plugins_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(".so") {
            plugins.push(entry.path());
        }
    }
    plugins.sort();
    Ok(plugins)
}

//! Universalize command - merges single-arch dylibs into one fat binary.

use std::path::Path;

use anyhow::{bail, Result};

use crate::lipo;

use super::require_tool;

/// Execute the universalize command.
///
/// `slices` are `arch=path` pairs; `replacements` are `old=new` load-path
/// substitutions applied to the merged binary's third-party dependencies.
/// Slice paths must be full paths; partial ones would produce malformed
/// load commands. Replacements may be partial.
pub fn cmd_universalize(slices: &[String], replacements: &[String], target: &Path) -> Result<()> {
    require_tool("lipo")?;
    require_tool("otool")?;
    require_tool("install_name_tool")?;

    let sources = parse_pairs(slices, "slice", "arch=path")?;
    let replace_paths = parse_pairs(replacements, "replacement", "old=new")?;

    println!(
        "Merging {} slices into {}",
        sources.len(),
        target.display()
    );
    lipo::universalize(&sources, &replace_paths, target)?;
    Ok(())
}

fn parse_pairs(args: &[String], what: &str, shape: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some((left, right)) if !left.is_empty() && !right.is_empty() => {
                pairs.push((left.to_string(), right.to_string()));
            }
            _ => bail!("invalid {what} {arg:?}, expected {shape}"),
        }
    }
    Ok(pairs)
}

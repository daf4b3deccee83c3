//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `frameworkize` - Convert dylibs and their closure into framework bundles
//! - `pluginize` - Rewrite plugin load paths against relocated frameworks
//! - `universalize` - Merge single-arch dylibs into a universal binary
//! - `show` - Print the parsed dependency listing for one binary
//! - `download` - Fetch and unpack dependency source archives

pub mod download;
pub mod frameworkize;
pub mod pluginize;
pub mod show;
pub mod universalize;

pub use download::cmd_download;
pub use frameworkize::cmd_frameworkize;
pub use pluginize::cmd_pluginize;
pub use show::cmd_show;
pub use universalize::cmd_universalize;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Fail early with a clear message when a collaborator tool is missing.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).with_context(|| format!("required tool `{name}` not found in PATH"))
}

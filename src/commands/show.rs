//! Show command - prints the parsed dependency listing for one binary.

use anyhow::Result;

use crate::otool::Otool;

/// Execute the show command.
pub fn cmd_show(binary: &str, arch: Option<&str>) -> Result<()> {
    let otool = match arch {
        Some(arch) => Otool::with_arch(arch),
        None => Otool::new(),
    };
    let listing = otool.listing(binary)?;

    println!("Library name: {}", listing.subject_name());
    println!("Library path: {}", listing.subject_path());
    println!("System shlib dependencies:");
    for dep in listing.system_deps() {
        println!("  {dep}");
    }
    println!("Third-party shlib dependencies:");
    for dep in listing.third_party_deps() {
        println!("  {dep}");
    }
    Ok(())
}

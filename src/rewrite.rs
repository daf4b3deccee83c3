//! Load-path rewriting via install_name_tool.
//!
//! The relocation scheme places each third-party library inside a framework
//! bundle under the application's Frameworks directory and then points every
//! dependent binary's load commands at the new location.

use std::path::Path;

use crate::error::DepError;
use crate::naming::FrameworkIdentity;
use crate::process;

/// Default run-time root for relocated frameworks, as recorded in load
/// commands.
pub const DEFAULT_FRAMEWORKS_ROOT: &str = "@executable_path/../Frameworks";

/// Install path of a relocated library inside its framework bundle:
/// `<root>/<name>.framework/Versions/<version>/<name>`.
pub fn framework_install_path(frameworks_root: &str, identity: &FrameworkIdentity) -> String {
    format!(
        "{root}/{name}.framework/Versions/{version}/{name}",
        root = frameworks_root,
        name = identity.name,
        version = identity.version,
    )
}

/// Point one of `binary`'s load commands from `old` at `new`.
pub fn change_load_path(old: &str, new: &str, binary: &Path) -> Result<(), DepError> {
    let binary = binary.to_string_lossy();
    process::run("install_name_tool", ["-change", old, new, binary.as_ref()])?;
    Ok(())
}

/// Set `binary`'s own install name.
pub fn set_install_name(name: &str, binary: &Path) -> Result<(), DepError> {
    let binary = binary.to_string_lossy();
    process::run("install_name_tool", ["-id", name, binary.as_ref()])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_install_path() {
        let identity = FrameworkIdentity {
            name: "libapr".to_string(),
            version: "1.0".to_string(),
        };
        assert_eq!(
            framework_install_path(DEFAULT_FRAMEWORKS_ROOT, &identity),
            "@executable_path/../Frameworks/libapr.framework/Versions/1.0/libapr"
        );
    }

    #[test]
    fn test_framework_install_path_unversioned() {
        let identity = FrameworkIdentity {
            name: "libintl".to_string(),
            version: "A".to_string(),
        };
        assert_eq!(
            framework_install_path("/Library/Frameworks", &identity),
            "/Library/Frameworks/libintl.framework/Versions/A/libintl"
        );
    }
}

//! Mapping from dylib file names to framework (name, version) pairs.
//!
//! Third-party libraries follow a handful of versioned-filename conventions
//! (`libapr-1.0.dylib`, `libexpat.1.dylib`, `libsqlite3.0.dylib`, plain
//! `libintl.dylib`). The extractor tries an ordered table of patterns and
//! fails loudly when none match, so the table can be extended instead of a
//! library being silently dropped from relocation.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::DepError;
use crate::listing::SHLIB_SUFFIX;

/// Version label for libraries whose file name carries no version token,
/// matching the default major-version directory of a framework bundle.
pub const UNVERSIONED: &str = "A";

/// Canonical framework name and version derived from a library path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkIdentity {
    pub name: String,
    pub version: String,
}

/// Ordered naming-convention table.
///
/// Order matters: dash-numeric and dot-separated names would both match the
/// looser suffix-numeric pattern, so the stricter forms are tried first.
/// Adding a new convention is a one-line addition here.
fn version_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // libapr-1.0, libsvn_wc-1.0
            ("dash-numeric", r"^([A-Za-z0-9_-]*)-([0-9.]*)$"),
            // libexpat.1, libiconv.2
            ("dot-separated", r"^([A-Za-z0-9_-]*[A-Za-z])\.([0-9.]*)$"),
            // libsqlite3.0
            ("suffix-numeric", r"^([A-Za-z0-9_-]*[A-Za-z])([0-9.]*)$"),
        ]
        .into_iter()
        .map(|(style, pattern)| {
            let re = Regex::new(pattern).expect("naming pattern must compile");
            (style, re)
        })
        .collect()
    })
}

/// Derive the framework identity for a third-party library path.
///
/// Only the final path component is considered. A bare letters-only name
/// (`libintl.dylib`) maps to the [`UNVERSIONED`] sentinel; otherwise the
/// first matching convention in the table wins.
pub fn framework_identity(library_path: &str) -> Result<FrameworkIdentity, DepError> {
    let file_name = library_path.rsplit('/').next().unwrap_or(library_path);

    // Letters-only base name with the suffix attached means the library
    // carries no version token at all.
    if let Some(stem) = file_name.strip_suffix(SHLIB_SUFFIX) {
        if !stem.is_empty() && stem.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(FrameworkIdentity {
                name: stem.to_string(),
                version: UNVERSIONED.to_string(),
            });
        }
    }

    let stem = file_name.strip_suffix(SHLIB_SUFFIX).unwrap_or(file_name);
    for (_style, re) in version_patterns() {
        if let Some(caps) = re.captures(stem) {
            return Ok(FrameworkIdentity {
                name: caps[1].to_string(),
                version: caps[2].to_string(),
            });
        }
    }

    Err(DepError::UnrecognizedNamingConvention {
        path: library_path.to_string(),
        name: file_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(path: &str) -> (String, String) {
        let id = framework_identity(path).unwrap();
        (id.name, id.version)
    }

    #[test]
    fn test_dash_numeric_style() {
        assert_eq!(
            identity("/opt/local/lib/libapr-1.0.dylib"),
            ("libapr".to_string(), "1.0".to_string())
        );
    }

    #[test]
    fn test_dot_separated_style() {
        assert_eq!(
            identity("/opt/local/lib/libexpat.1.dylib"),
            ("libexpat".to_string(), "1".to_string())
        );
    }

    #[test]
    fn test_suffix_numeric_style() {
        assert_eq!(
            identity("/opt/local/lib/libsqlite3.0.dylib"),
            ("libsqlite".to_string(), "3.0".to_string())
        );
    }

    #[test]
    fn test_unversioned_name() {
        assert_eq!(
            identity("/opt/local/lib/libintl.dylib"),
            ("libintl".to_string(), "A".to_string())
        );
    }

    #[test]
    fn test_underscore_names_keep_full_prefix() {
        assert_eq!(
            identity("/opt/svn/lib/libsvn_wc-1.0.dylib"),
            ("libsvn_wc".to_string(), "1.0".to_string())
        );
    }

    #[test]
    fn test_unrecognized_name_fails() {
        let err = framework_identity("/not/a/valid/&&&").unwrap_err();
        match err {
            DepError::UnrecognizedNamingConvention { path, name } => {
                assert_eq!(path, "/not/a/valid/&&&");
                assert_eq!(name, "&&&");
            }
            other => panic!("expected naming error, got {other:?}"),
        }
    }

    #[test]
    fn test_table_order_prefers_dash_over_suffix() {
        // "libaprutil-1.0" also matches the suffix-numeric pattern with a
        // mangled name; the dash-numeric form must win.
        assert_eq!(
            identity("/opt/local/lib/libaprutil-1.0.dylib"),
            ("libaprutil".to_string(), "1.0".to_string())
        );
    }
}

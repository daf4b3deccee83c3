//! Parser for `otool -L` output.
//!
//! otool prints the inspected binary's path followed by one indented line per
//! referenced library:
//!
//! ```text
//! /opt/svn/lib/libsvn_wc-1.0.dylib:
//!     /opt/svn/lib/libsvn_wc-1.0.dylib (compatibility version 1.0.0, current version 1.0.0)
//!     /opt/local/lib/libz.1.dylib (compatibility version 1.0.0, current version 1.2.3)
//!     /usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 88.3.9)
//! ```
//!
//! The parenthetical version metadata is discarded. References to framework
//! bundles are dropped (only flat shared libraries are relocation candidates),
//! and the subject's own self-reference never appears in `references`.

use crate::error::DepError;

/// Path prefix of libraries shipped with the base OS.
pub const SYSTEM_PREFIX: &str = "/usr/";

/// Shared-library file suffix on the reference platform.
pub const SHLIB_SUFFIX: &str = ".dylib";

/// How a referenced path participates in relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryClass {
    /// Shipped with the OS; load paths stay untouched.
    SystemProvided,
    /// A relocation candidate.
    ThirdParty,
    /// Not a flat shared library (framework bundles and the like).
    Ignored,
}

/// Classify a referenced library path.
///
/// Pure function of the path string; the three classes never overlap.
pub fn classify(path: &str) -> LibraryClass {
    if !path.ends_with(SHLIB_SUFFIX) {
        return LibraryClass::Ignored;
    }
    if path.starts_with(SYSTEM_PREFIX) {
        LibraryClass::SystemProvided
    } else {
        LibraryClass::ThirdParty
    }
}

/// Parsed `otool -L` output for one binary.
#[derive(Debug, Clone)]
pub struct DependencyListing {
    subject_path: String,
    subject_name: String,
    references: Vec<String>,
}

impl DependencyListing {
    /// Parse raw `otool -L` output.
    pub fn parse(text: &str) -> Result<Self, DepError> {
        let mut lines = text.lines();

        let header = match lines.next() {
            Some(line) if !line.trim().is_empty() => line,
            _ => {
                return Err(DepError::MalformedListing {
                    reason: "empty otool output".to_string(),
                })
            }
        };
        let subject_path = match header.strip_suffix(':') {
            Some(path) => path.to_string(),
            None => {
                return Err(DepError::MalformedListing {
                    reason: format!("first line has no trailing colon: {header:?}"),
                })
            }
        };
        let subject_name = subject_path
            .rsplit('/')
            .next()
            .unwrap_or(&subject_path)
            .to_string();

        let mut references = Vec::new();
        for line in lines {
            let entry = line.trim_start();
            if entry.is_empty() {
                continue;
            }
            let entry = strip_version_metadata(entry);
            // Framework bundle references are not flat shared libraries and
            // are out of scope for relocation.
            if entry.contains("framework") {
                continue;
            }
            // otool repeats the subject path as its first entry.
            if entry == subject_path {
                continue;
            }
            references.push(entry.to_string());
        }

        Ok(Self {
            subject_path,
            subject_name,
            references,
        })
    }

    /// Absolute path of the binary the listing describes.
    pub fn subject_path(&self) -> &str {
        &self.subject_path
    }

    /// Final path component of the subject path.
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    /// All referenced library paths, in input order.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// References provided by the base OS, in input order.
    pub fn system_deps(&self) -> Vec<&str> {
        self.references
            .iter()
            .map(String::as_str)
            .filter(|path| classify(path) == LibraryClass::SystemProvided)
            .collect()
    }

    /// References that are relocation candidates, in input order.
    ///
    /// Duplicates in the raw input survive here; the closure resolver treats
    /// the result as a set.
    pub fn third_party_deps(&self) -> Vec<&str> {
        self.references
            .iter()
            .map(String::as_str)
            .filter(|path| classify(path) == LibraryClass::ThirdParty)
            .collect()
    }
}

/// Drop the trailing ` (compatibility version ..., current version ...)`
/// annotation from a reference line.
fn strip_version_metadata(entry: &str) -> &str {
    match entry.find(" (") {
        Some(idx) => &entry[..idx],
        None => entry,
    }
}

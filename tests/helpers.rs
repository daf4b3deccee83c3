//! Shared test utilities for framework-maker tests.

use std::collections::HashMap;

use framework_maker::closure::Inspect;
use framework_maker::error::DepError;
use framework_maker::listing::DependencyListing;

/// Reference listing: a subversion working-copy library that references
/// itself, one system library, and nine third-party libraries.
pub const LIBSVN_WC: &str = "\
/opt/svn/lib/libsvn_wc-1.0.dylib:
\t/opt/svn/lib/libsvn_wc-1.0.dylib (compatibility version 1.0.0, current version 1.0.0)
\t/opt/local/lib/libz.1.dylib (compatibility version 1.0.0, current version 1.2.3)
\t/opt/svn/lib/libsvn_subr-1.0.dylib (compatibility version 1.0.0, current version 1.0.0)
\t/opt/svn/lib/libsvn_delta-1.0.dylib (compatibility version 1.0.0, current version 1.0.0)
\t/opt/svn/lib/libsvn_diff-1.0.dylib (compatibility version 1.0.0, current version 1.0.0)
\t/opt/local/lib/libaprutil-1.0.dylib (compatibility version 3.0.0, current version 3.9.0)
\t/opt/local/lib/libsqlite3.0.dylib (compatibility version 9.0.0, current version 9.6.0)
\t/opt/local/lib/libexpat.1.dylib (compatibility version 7.0.0, current version 7.2.0)
\t/opt/local/lib/libapr-1.0.dylib (compatibility version 3.0.0, current version 3.9.0)
\t/usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 88.3.9)
\t/opt/local/lib/libintl.8.dylib (compatibility version 9.0.0, current version 9.1.0)
";

/// The nine third-party references from [`LIBSVN_WC`], in listing order.
pub const LIBSVN_WC_THIRD_PARTY: &[&str] = &[
    "/opt/local/lib/libz.1.dylib",
    "/opt/svn/lib/libsvn_subr-1.0.dylib",
    "/opt/svn/lib/libsvn_delta-1.0.dylib",
    "/opt/svn/lib/libsvn_diff-1.0.dylib",
    "/opt/local/lib/libaprutil-1.0.dylib",
    "/opt/local/lib/libsqlite3.0.dylib",
    "/opt/local/lib/libexpat.1.dylib",
    "/opt/local/lib/libapr-1.0.dylib",
    "/opt/local/lib/libintl.8.dylib",
];

/// In-memory stand-in for otool: serves canned listing text per path.
/// Unknown paths act as leaf libraries with no references.
pub struct FakeInspector {
    listings: HashMap<String, String>,
}

impl FakeInspector {
    pub fn new() -> Self {
        Self {
            listings: HashMap::new(),
        }
    }

    /// Register a library and the third-party paths it references.
    pub fn with_library(mut self, path: &str, deps: &[&str]) -> Self {
        let mut text = format!(
            "{path}:\n\t{path} (compatibility version 1.0.0, current version 1.0.0)\n"
        );
        for dep in deps {
            text.push_str(&format!(
                "\t{dep} (compatibility version 1.0.0, current version 1.0.0)\n"
            ));
        }
        self.listings.insert(path.to_string(), text);
        self
    }

    /// Register raw listing text for a path.
    pub fn with_raw(mut self, path: &str, text: &str) -> Self {
        self.listings.insert(path.to_string(), text.to_string());
        self
    }
}

impl Inspect for FakeInspector {
    fn inspect(&self, path: &str) -> Result<DependencyListing, DepError> {
        let text = self.listings.get(path).cloned().unwrap_or_else(|| {
            format!("{path}:\n\t{path} (compatibility version 1.0.0, current version 1.0.0)\n")
        });
        DependencyListing::parse(&text)
    }
}

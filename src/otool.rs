//! Wrapper around the system dependency inspector, `otool -L`.

use crate::closure::Inspect;
use crate::error::DepError;
use crate::listing::DependencyListing;
use crate::process::Cmd;

/// Runs `otool -L` against binaries and parses the output.
#[derive(Debug, Clone, Default)]
pub struct Otool {
    /// Restrict inspection to a single architecture slice of a fat binary.
    arch: Option<String>,
}

impl Otool {
    pub fn new() -> Self {
        Self { arch: None }
    }

    pub fn with_arch(arch: impl Into<String>) -> Self {
        Self {
            arch: Some(arch.into()),
        }
    }

    /// Inspect one binary and return its parsed listing.
    ///
    /// Fails closed: a non-zero otool exit or spawn failure is surfaced
    /// rather than parsed as an empty listing.
    pub fn listing(&self, path: &str) -> Result<DependencyListing, DepError> {
        let mut cmd = Cmd::new("otool").arg("-L");
        if let Some(arch) = &self.arch {
            cmd = cmd.arg("-arch").arg(arch);
        }
        let result = cmd.arg(path).run()?;
        DependencyListing::parse(&result.stdout)
    }
}

impl Inspect for Otool {
    fn inspect(&self, path: &str) -> Result<DependencyListing, DepError> {
        self.listing(path)
    }
}

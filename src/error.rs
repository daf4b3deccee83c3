//! Error types for the dependency-resolution core.
//!
//! These are deterministic failures: a listing that doesn't parse, a library
//! file name no pattern recognizes, or a collaborator tool that exited
//! non-zero. None of them are retryable; callers abort the operation that
//! triggered them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DepError {
    /// The dependency listing did not have the expected header + indented-list
    /// shape.
    #[error("malformed dependency listing: {reason}")]
    MalformedListing { reason: String },

    /// A third-party library's file name matched none of the known naming
    /// conventions. Deliberately a hard stop: extend the pattern table in
    /// `naming` rather than guess, since a skipped library would be silently
    /// dropped from relocation.
    #[error(
        "library {path} with name {name} did not match any known naming \
         convention; add a pattern to the table in naming.rs"
    )]
    UnrecognizedNamingConvention { path: String, name: String },

    /// A collaborator tool ran but exited non-zero.
    #[error("`{tool}` failed (exit code {code}): {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// A collaborator tool could not be started at all.
    #[error("failed to launch `{tool}`: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

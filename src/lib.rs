//! Dependency packaging for distributable framework bundles.
//!
//! Third-party dylibs a desktop application links against are discovered by
//! parsing `otool -L` output, closed over transitively, mapped to canonical
//! framework (name, version) pairs, and relocated into the application
//! bundle by external tools (`rtool`, `install_name_tool`, `lipo`).

pub mod closure;
pub mod commands;
pub mod error;
pub mod lipo;
pub mod listing;
pub mod naming;
pub mod otool;
pub mod process;
pub mod rewrite;

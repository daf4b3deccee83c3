//! Transitive third-party dependency discovery.
//!
//! Starting from a seed set of binaries, repeatedly inspect every known
//! library and union in its third-party references until the set stops
//! growing. The working set lives entirely within one call; nothing is
//! persisted between resolutions.

use std::collections::{BTreeSet, VecDeque};

use crate::error::DepError;
use crate::listing::DependencyListing;

/// Source of dependency listings for a binary, normally [`crate::otool::Otool`].
///
/// A trait seam so closure logic is testable without a Mach-O toolchain on
/// the build host.
pub trait Inspect {
    fn inspect(&self, path: &str) -> Result<DependencyListing, DepError>;
}

/// Resolve the transitive set of third-party libraries reachable from `seeds`.
///
/// Explicit pending-queue / visited-set fixed point: every known path is
/// expanded exactly once, so dependency cycles terminate and resolving the
/// result as a new seed set returns the same set. The seeds themselves are
/// part of the result. Output is sorted for deterministic downstream use.
pub fn resolve_closure<I>(inspector: &I, seeds: &[String]) -> Result<BTreeSet<String>, DepError>
where
    I: Inspect,
{
    let mut known: BTreeSet<String> = seeds.iter().cloned().collect();
    let mut pending: VecDeque<String> = known.iter().cloned().collect();

    while let Some(path) = pending.pop_front() {
        let listing = inspector.inspect(&path)?;
        for dep in listing.third_party_deps() {
            if known.insert(dep.to_string()) {
                pending.push_back(dep.to_string());
            }
        }
    }

    Ok(known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory inspector over canned listing text, counting invocations.
    struct FakeInspector {
        listings: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeInspector {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                listings: entries
                    .iter()
                    .map(|(path, text)| (path.to_string(), text.to_string()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Inspect for FakeInspector {
        fn inspect(&self, path: &str) -> Result<DependencyListing, DepError> {
            self.calls.borrow_mut().push(path.to_string());
            let text = self.listings.get(path).cloned().unwrap_or_else(|| {
                // Leaf library with no dependencies beyond itself.
                format!("{path}:\n\t{path} (compatibility version 1.0.0, current version 1.0.0)\n")
            });
            DependencyListing::parse(&text)
        }
    }

    fn listing(subject: &str, deps: &[&str]) -> String {
        let mut text = format!("{subject}:\n\t{subject} (compatibility version 1.0.0, current version 1.0.0)\n");
        for dep in deps {
            text.push_str(&format!(
                "\t{dep} (compatibility version 1.0.0, current version 1.0.0)\n"
            ));
        }
        text
    }

    #[test]
    fn test_transitive_dependencies_discovered() {
        let a = "/opt/lib/liba-1.0.dylib";
        let b = "/opt/lib/libb-1.0.dylib";
        let c = "/opt/lib/libc-1.0.dylib";
        let inspector = FakeInspector::new(&[
            (a, &listing(a, &[b])),
            (b, &listing(b, &[c])),
        ]);

        let resolved = resolve_closure(&inspector, &[a.to_string()]).unwrap();
        let expected: BTreeSet<String> =
            [a, b, c].iter().map(|s| s.to_string()).collect();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_cycle_terminates() {
        let a = "/opt/lib/liba-1.0.dylib";
        let b = "/opt/lib/libb-1.0.dylib";
        let inspector = FakeInspector::new(&[
            (a, &listing(a, &[b])),
            (b, &listing(b, &[a])),
        ]);

        let resolved = resolve_closure(&inspector, &[a.to_string()]).unwrap();
        let expected: BTreeSet<String> = [a, b].iter().map(|s| s.to_string()).collect();
        assert_eq!(resolved, expected);
        // Each node expanded exactly once despite the mutual reference.
        assert_eq!(inspector.calls.borrow().len(), 2);
    }

    #[test]
    fn test_fixed_point_is_idempotent() {
        let a = "/opt/lib/liba-1.0.dylib";
        let b = "/opt/lib/libb-1.0.dylib";
        let inspector = FakeInspector::new(&[(a, &listing(a, &[b]))]);

        let first = resolve_closure(&inspector, &[a.to_string()]).unwrap();
        let seeds: Vec<String> = first.iter().cloned().collect();
        let second = resolve_closure(&inspector, &seeds).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_system_libraries_not_expanded() {
        let a = "/opt/lib/liba-1.0.dylib";
        let inspector = FakeInspector::new(&[(
            a,
            &listing(a, &["/usr/lib/libSystem.B.dylib"]),
        )]);

        let resolved = resolve_closure(&inspector, &[a.to_string()]).unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains(a));
    }

    #[test]
    fn test_malformed_listing_propagates() {
        let a = "/opt/lib/liba-1.0.dylib";
        let inspector = FakeInspector::new(&[(a, "no trailing colon\n")]);

        let err = resolve_closure(&inspector, &[a.to_string()]).unwrap_err();
        assert!(matches!(err, DepError::MalformedListing { .. }));
    }
}

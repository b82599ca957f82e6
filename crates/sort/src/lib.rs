//! Manifold sort: order manifests so dependencies are created first.
//!
//! The ordering is a static lookup by `kind` (see [`priority`]), not a
//! dependency graph. Unrecognized kinds trail the known ones, ordered by kind
//! name. Remaining ties (equal rank, or the same unrecognized kind) are left to
//! the stable sort in [`Manifest::sort`] and keep their input order.

#![forbid(unsafe_code)]

use std::cmp::Ordering;

use manifold_core::{Manifest, Resource};
use metrics::{counter, histogram};
use rustc_hash::FxHashSet;
use tracing::debug;

mod priority;

pub use priority::{known_kinds, priority, rank, UNKNOWN_PRIORITY};

/// Comparator ordering records by kind priority.
///
/// Known kinds compare by rank and always precede unknown kinds; two unknown
/// kinds compare by name.
pub fn by_kind_priority() -> impl Fn(&Resource, &Resource) -> Ordering + Copy + Send + Sync {
    |a: &Resource, b: &Resource| compare_kinds(a.kind(), b.kind())
}

pub fn compare_kinds(a: &str, b: &str) -> Ordering {
    match (priority(a), priority(b)) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// [`Manifest::sort`] with [`by_kind_priority`], logging unrecognized kinds.
pub fn sort_by_kind(manifest: &Manifest) -> Manifest {
    let t0 = std::time::Instant::now();
    let mut unknown: FxHashSet<&str> = FxHashSet::default();
    for r in manifest {
        if priority(r.kind()).is_none() {
            counter!("sort_unknown_kinds_total", 1u64);
            if unknown.insert(r.kind()) {
                debug!(kind = %r.kind(), name = %r.name(), "unrecognized kind; ordering after known kinds");
            }
        }
    }
    let sorted = manifest.sort(by_kind_priority());
    counter!("sort_resources_total", manifest.len() as u64);
    histogram!("sort_latency_ms", t0.elapsed().as_secs_f64() * 1000.0);
    debug!(resources = sorted.len(), unknown_kinds = unknown.len(), "sorted manifest by kind priority");
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparator_rules() {
        assert_eq!(compare_kinds("Namespace", "Deployment"), Ordering::Less);
        assert_eq!(compare_kinds("Job", "Deployment"), Ordering::Greater);
        assert_eq!(compare_kinds("Secret", "SecretList"), Ordering::Equal);
        assert_eq!(compare_kinds("Job", "Widget"), Ordering::Less);
        assert_eq!(compare_kinds("Widget", "Namespace"), Ordering::Greater);
        assert_eq!(compare_kinds("Widget", "Gadget"), Ordering::Greater);
        assert_eq!(compare_kinds("Gadget", "Widget"), Ordering::Less);
        assert_eq!(compare_kinds("Widget", "Widget"), Ordering::Equal);
        assert_eq!(compare_kinds("", "Gadget"), Ordering::Less);
    }

    #[test]
    fn empty_manifest_sorts_to_empty() {
        assert!(sort_by_kind(&Manifest::default()).is_empty());
        assert!(Manifest::default().sort(by_kind_priority()).is_empty());
    }
}

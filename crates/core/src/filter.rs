//! Predicates for [`Manifest::filter`](crate::Manifest::filter).

use kube::core::GroupVersionKind;

use crate::Resource;

pub type Predicate = Box<dyn Fn(&Resource) -> bool + Send + Sync>;

pub fn everything() -> Predicate {
    Box::new(|_: &Resource| true)
}

pub fn by_kind(kind: impl Into<String>) -> Predicate {
    let kind = kind.into();
    Box::new(move |r: &Resource| r.kind() == kind)
}

pub fn by_name(name: impl Into<String>) -> Predicate {
    let name = name.into();
    Box::new(move |r: &Resource| r.name() == name)
}

/// Matches namespaced records in `ns`. Cluster-scoped records never match.
pub fn by_namespace(ns: impl Into<String>) -> Predicate {
    let ns = ns.into();
    Box::new(move |r: &Resource| r.namespace() == Some(ns.as_str()))
}

pub fn by_gvk(gvk: GroupVersionKind) -> Predicate {
    Box::new(move |r: &Resource| r.gvk() == gvk)
}

/// With `value = None` only the key has to be present.
pub fn by_label(key: impl Into<String>, value: Option<String>) -> Predicate {
    let key = key.into();
    Box::new(move |r: &Resource| match (r.label(&key), value.as_deref()) {
        (Some(have), Some(want)) => have == want,
        (Some(_), None) => true,
        (None, _) => false,
    })
}

pub fn not(pred: Predicate) -> Predicate {
    Box::new(move |r: &Resource| !pred(r))
}

/// True when every predicate holds (vacuously true for an empty list).
pub fn all(preds: Vec<Predicate>) -> Predicate {
    Box::new(move |r: &Resource| preds.iter().all(|p| p(r)))
}

/// True when any predicate holds (false for an empty list).
pub fn any(preds: Vec<Predicate>) -> Predicate {
    Box::new(move |r: &Resource| preds.iter().any(|p| p(r)))
}

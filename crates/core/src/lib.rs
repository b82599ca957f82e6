//! Manifold core types: generic resource records and ordered manifests.

#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;

use kube::core::GroupVersionKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

pub mod filter;

pub use filter::Predicate;

/// Errors raised while building records from arbitrary values.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("resource must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("serializing typed object: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// A schema-less Kubernetes object.
///
/// Accessors are tolerant: a missing or non-string field reads as `""` (or
/// `None` for optional fields) instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource {
    object: Map<String, Json>,
}

impl Resource {
    /// Wrap a JSON object. Any other JSON value is rejected.
    pub fn new(value: Json) -> CoreResult<Self> {
        match value {
            Json::Object(object) => Ok(Self { object }),
            other => Err(CoreError::NotAnObject { found: json_type_name(&other) }),
        }
    }

    /// Build a record from any serializable object, e.g. a `k8s-openapi` type.
    pub fn from_typed<T: Serialize>(typed: &T) -> CoreResult<Self> {
        Self::new(serde_json::to_value(typed)?)
    }

    /// `apiVersion`, e.g. `v1` or `apps/v1`.
    pub fn api_version(&self) -> &str {
        self.str_at(&["apiVersion"]).unwrap_or("")
    }

    /// Declared type name; `""` when missing or not a string.
    pub fn kind(&self) -> &str {
        self.str_at(&["kind"]).unwrap_or("")
    }

    /// `metadata.name`; `""` when missing.
    pub fn name(&self) -> &str {
        self.str_at(&["metadata", "name"]).unwrap_or("")
    }

    /// `metadata.namespace`; `None` for cluster-scoped records or an empty value.
    pub fn namespace(&self) -> Option<&str> {
        self.str_at(&["metadata", "namespace"]).filter(|ns| !ns.is_empty())
    }

    /// Value of `metadata.labels[key]`.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.str_at(&["metadata", "labels", key])
    }

    /// Group/version/kind; the core group is the empty string.
    pub fn gvk(&self) -> GroupVersionKind {
        let (group, version) = match self.api_version().split_once('/') {
            Some((g, v)) => (g.to_string(), v.to_string()),
            None => (String::new(), self.api_version().to_string()),
        };
        GroupVersionKind { group, version, kind: self.kind().to_string() }
    }

    /// Nested lookup by object keys, e.g. `["spec", "replicas"]`.
    pub fn get(&self, path: &[&str]) -> Option<&Json> {
        let (first, rest) = path.split_first()?;
        let mut cur = self.object.get(*first)?;
        for key in rest {
            cur = cur.as_object()?.get(*key)?;
        }
        Some(cur)
    }

    /// Borrow the underlying object.
    pub fn as_object(&self) -> &Map<String, Json> {
        &self.object
    }

    pub fn to_value(&self) -> Json {
        Json::Object(self.object.clone())
    }

    pub fn into_value(self) -> Json {
        Json::Object(self.object)
    }

    fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }
}

impl TryFrom<Json> for Resource {
    type Error = CoreError;

    fn try_from(value: Json) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(ns) => write!(f, "{}/{}/{}", self.kind(), ns, self.name()),
            None => write!(f, "{}/{}", self.kind(), self.name()),
        }
    }
}

fn json_type_name(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Ordered collection of resources. Duplicates are kept as-is.
///
/// Every operation returns a new manifest; the receiver is never reordered in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    resources: Vec<Resource>,
}

impl Manifest {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn into_resources(self) -> Vec<Resource> {
        self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    /// Reorder with `cmp` using a stable sort: records comparing `Equal` keep
    /// their input order.
    pub fn sort<F>(&self, cmp: F) -> Manifest
    where
        F: Fn(&Resource, &Resource) -> Ordering,
    {
        let mut resources = self.resources.clone();
        resources.sort_by(|a, b| cmp(a, b));
        Manifest { resources }
    }

    /// Keep the records matching `pred`, in order.
    pub fn filter<P>(&self, pred: P) -> Manifest
    where
        P: Fn(&Resource) -> bool,
    {
        self.resources.iter().filter(|r| pred(*r)).cloned().collect()
    }

    pub fn append(&self, other: &Manifest) -> Manifest {
        self.resources.iter().chain(other.resources.iter()).cloned().collect()
    }
}

impl From<Vec<Resource>> for Manifest {
    fn from(resources: Vec<Resource>) -> Self {
        Self::new(resources)
    }
}

impl FromIterator<Resource> for Manifest {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self { resources: iter.into_iter().collect() }
    }
}

impl IntoIterator for Manifest {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

pub mod prelude {
    pub use super::{CoreError, CoreResult, Manifest, Resource};
    pub use crate::filter::{self, Predicate};
}

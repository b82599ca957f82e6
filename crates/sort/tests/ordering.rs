#![forbid(unsafe_code)]

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use manifold_core::{Manifest, Resource};
use manifold_sort::{by_kind_priority, sort_by_kind};

fn obj(api_version: &str, kind: &str, name: &str) -> Resource {
    Resource::new(serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "name": name },
    }))
    .unwrap()
}

fn kinds(m: &Manifest) -> Vec<&str> {
    m.iter().map(|r| r.kind()).collect()
}

fn names(m: &Manifest) -> Vec<&str> {
    m.iter().map(|r| r.name()).collect()
}

#[test]
fn dependencies_come_before_dependents() {
    let m = Manifest::new(vec![
        obj("batch/v1", "Job", "test-job"),
        obj("apps/v1", "Deployment", "test-deployment"),
        obj("v1", "Namespace", "test-namespace"),
        obj("v1", "Secret", "test-secret"),
        obj("v1", "Service", "test-service"),
        obj("v1", "ConfigMap", "test-configmap"),
        obj("apiextensions.k8s.io/v1", "CustomResourceDefinition", "test-crd"),
        obj("v1", "ServiceAccount", "test-serviceaccount"),
    ]);

    let sorted = m.sort(by_kind_priority());

    assert_eq!(sorted.len(), 8);
    assert_eq!(
        kinds(&sorted),
        [
            "Namespace",
            "ServiceAccount",
            "Secret",
            "ConfigMap",
            "CustomResourceDefinition",
            "Service",
            "Deployment",
            "Job",
        ]
    );
}

#[test]
fn unknown_kinds_trail_ordered_by_name() {
    let m = Manifest::new(vec![
        obj("custom.io/v1", "UnknownKind", "test-unknown"),
        obj("v1", "Namespace", "test-namespace"),
        obj("custom.io/v1", "AnotherUnknown", "test-another"),
        obj("apps/v1", "Deployment", "test-deployment"),
    ]);

    let sorted = m.sort(by_kind_priority());

    assert_eq!(sorted.len(), 4);
    assert_eq!(kinds(&sorted), ["Namespace", "Deployment", "AnotherUnknown", "UnknownKind"]);
}

#[test]
fn same_unknown_kind_keeps_input_order() {
    let m = Manifest::new(vec![
        obj("custom.io/v1", "Widget", "w1"),
        obj("custom.io/v1", "Gadget", "g1"),
        obj("v1", "Namespace", "ns"),
        obj("custom.io/v1", "Widget", "w2"),
        obj("custom.io/v1", "Gadget", "g2"),
    ]);

    let sorted = m.sort(by_kind_priority());

    assert_eq!(names(&sorted), ["ns", "g1", "g2", "w1", "w2"]);
}

#[test]
fn missing_or_empty_kind_counts_as_unknown() {
    let no_kind = Resource::new(serde_json::json!({ "metadata": { "name": "no-kind" } })).unwrap();
    let empty_kind = obj("v1", "", "empty-kind");
    let m = Manifest::new(vec![no_kind, obj("v1", "Pod", "pod"), empty_kind, obj("v1", "Namespace", "ns")]);

    let sorted = m.sort(by_kind_priority());

    assert_eq!(names(&sorted), ["ns", "pod", "no-kind", "empty-kind"]);
}

#[test]
fn same_rank_keeps_input_order() {
    let m = Manifest::new(vec![
        obj("v1", "SecretList", "list"),
        obj("v1", "Deployment", "d1"),
        obj("v1", "Secret", "s1"),
        obj("v1", "Deployment", "d2"),
        obj("v1", "Secret", "s2"),
    ]);

    let sorted = m.sort(by_kind_priority());

    assert_eq!(names(&sorted), ["list", "s1", "s2", "d1", "d2"]);
}

#[test]
fn duplicates_are_preserved() {
    let cm = obj("v1", "ConfigMap", "same");
    let m = Manifest::new(vec![cm.clone(), obj("v1", "Namespace", "ns"), cm.clone()]);

    let sorted = sort_by_kind(&m);

    assert_eq!(names(&sorted), ["ns", "same", "same"]);
    assert_eq!(sorted.resources()[1], sorted.resources()[2]);
}

#[test]
fn sort_leaves_records_untouched() {
    let dep = Resource::new(serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": "web", "namespace": "prod" },
        "spec": { "replicas": 2, "template": { "spec": { "containers": [{ "name": "c", "image": "nginx" }] } } },
    }))
    .unwrap();
    let m = Manifest::new(vec![dep.clone(), obj("v1", "Namespace", "prod")]);

    let sorted = sort_by_kind(&m);

    assert_eq!(sorted.resources()[1], dep);
    assert_eq!(kinds(&m), ["Deployment", "Namespace"]);
}

#[test]
fn typed_objects_sort_like_untyped() {
    let meta = |name: &str| ObjectMeta { name: Some(name.into()), ..Default::default() };
    let m = Manifest::new(vec![
        Resource::from_typed(&Deployment { metadata: meta("web"), ..Default::default() }).unwrap(),
        Resource::from_typed(&ConfigMap { metadata: meta("cfg"), ..Default::default() }).unwrap(),
        Resource::from_typed(&Namespace { metadata: meta("team"), ..Default::default() }).unwrap(),
    ]);

    let sorted = sort_by_kind(&m);

    assert_eq!(names(&sorted), ["team", "cfg", "web"]);
}

//! Kind-priority table: conventional creation order for built-in kinds.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Creation layers, earliest first. Kinds in the same layer share a rank.
pub(crate) const LAYERS: &[&[&str]] = &[
    &["Namespace"],
    &["NetworkPolicy"],
    &["ResourceQuota"],
    &["LimitRange"],
    &["PodSecurityPolicy"],
    &["PodDisruptionBudget"],
    &["ServiceAccount"],
    &["Secret", "SecretList"],
    &["ConfigMap"],
    &["StorageClass"],
    &["PersistentVolume"],
    &["PersistentVolumeClaim"],
    &["CustomResourceDefinition"],
    &["ClusterRole", "ClusterRoleList"],
    &["ClusterRoleBinding", "ClusterRoleBindingList"],
    &["Role", "RoleList"],
    &["RoleBinding", "RoleBindingList"],
    &["Service"],
    &["DaemonSet"],
    &["Pod"],
    &["ReplicationController"],
    &["ReplicaSet"],
    &["Deployment"],
    &["HorizontalPodAutoscaler"],
    &["StatefulSet"],
    &["Job"],
    &["CronJob"],
    &["IngressClass"],
    &["Ingress"],
    &["APIService"],
    &["MutatingWebhookConfiguration", "ValidatingWebhookConfiguration"],
];

/// Rank given to every kind missing from the table; above all table ranks.
pub const UNKNOWN_PRIORITY: u32 = LAYERS.len() as u32;

static TABLE: Lazy<FxHashMap<&'static str, u32>> = Lazy::new(|| {
    let mut table = FxHashMap::default();
    for (rank, layer) in LAYERS.iter().enumerate() {
        for kind in layer.iter() {
            // first layer wins if a kind were ever listed twice
            table.entry(*kind).or_insert(rank as u32);
        }
    }
    table
});

/// Rank of `kind`, exact and case-sensitive. `None` for unrecognized kinds.
pub fn priority(kind: &str) -> Option<u32> {
    TABLE.get(kind).copied()
}

/// Rank of `kind`, falling back to [`UNKNOWN_PRIORITY`].
pub fn rank(kind: &str) -> u32 {
    priority(kind).unwrap_or(UNKNOWN_PRIORITY)
}

/// Table contents in creation order.
pub fn known_kinds() -> Vec<(&'static str, u32)> {
    LAYERS
        .iter()
        .enumerate()
        .flat_map(|(rank, layer)| layer.iter().map(move |kind| (*kind, rank as u32)))
        .collect()
}

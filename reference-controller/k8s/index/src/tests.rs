use crate::{Entry, Index, Reader, SharedIndex, Synced};
use kubert::index::{
    ClusterRemoved, IndexClusterResource, IndexNamespacedResource, NamespacedRemoved,
};
use maplit::btreemap;
use pretty_assertions::assert_eq;
use reference_controller_core::{Kind, Lookup, Reference, API_GROUP, API_VERSION};
use reference_controller_k8s_api::{
    garden::{self, LocalObjectReference, ObjectReference, SecretReference},
    ObjectMeta, Resource, Secret,
};
use tokio::time;

#[test]
fn secrets_are_indexed_by_namespace() {
    let test = TestConfig::default();

    IndexNamespacedResource::apply(&mut *test.index.write(), mk_secret("ns-0", "s-0"));
    assert_eq!(
        test.index.read().lookup(Kind::Secret, Some("ns-0"), "s-0"),
        Some(&Entry {
            uid: Some("ns-0.s-0".to_string()),
            resource_version: Some("1".to_string()),
        })
    );
    assert_eq!(
        test.index.read().lookup(Kind::Secret, Some("ns-1"), "s-0"),
        None
    );
    assert_eq!(test.index.read().lookup(Kind::Secret, None, "s-0"), None);
    assert_eq!(
        test.index.read().lookup(Kind::Quota, Some("ns-0"), "s-0"),
        None,
        "kinds must not share a namespace"
    );

    IndexNamespacedResource::<Secret>::delete(
        &mut *test.index.write(),
        "ns-0".to_string(),
        "s-0".to_string(),
    );
    assert_eq!(
        test.index.read().lookup(Kind::Secret, Some("ns-0"), "s-0"),
        None
    );
    assert_eq!(test.index.read().len(Kind::Secret), 0);
}

#[test]
fn cluster_scoped_kinds_ignore_namespace() {
    let test = TestConfig::default();

    IndexClusterResource::apply(&mut *test.index.write(), mk_cloud_profile("cp-0"));
    IndexClusterResource::apply(&mut *test.index.write(), mk_seed("seed-0"));

    let index = test.index.read();
    assert!(index.lookup(Kind::CloudProfile, None, "cp-0").is_some());
    assert!(index.lookup(Kind::CloudProfile, Some("ns-0"), "cp-0").is_some());
    assert!(index.lookup(Kind::Seed, None, "seed-0").is_some());
    assert!(index.lookup(Kind::Seed, None, "cp-0").is_none());
    drop(index);

    IndexClusterResource::<garden::Seed>::delete(&mut *test.index.write(), "seed-0".to_string());
    assert!(test.index.read().lookup(Kind::Seed, None, "seed-0").is_none());
}

#[test]
fn binding_variants_are_indexed_separately() {
    let test = TestConfig::default();
    IndexNamespacedResource::apply(&mut *test.index.write(), mk_secret_binding("ns-0", "b-0"));
    IndexNamespacedResource::apply(&mut *test.index.write(), mk_private_binding("ns-0", "b-1"));
    IndexNamespacedResource::apply(&mut *test.index.write(), mk_cross_binding("ns-0", "b-2"));

    let reader = Reader::new(test.index.clone());
    assert!(reader.contains(&Reference::namespaced(Kind::SecretBinding, "ns-0", "b-0")));
    assert!(!reader.contains(&Reference::namespaced(
        Kind::PrivateSecretBinding,
        "ns-0",
        "b-0"
    )));
    assert!(reader.contains(&Reference::namespaced(
        Kind::PrivateSecretBinding,
        "ns-0",
        "b-1"
    )));
    assert!(reader.contains(&Reference::namespaced(
        Kind::CrossSecretBinding,
        "ns-0",
        "b-2"
    )));
    assert!(!reader.contains(&Reference::namespaced(
        Kind::CrossSecretBinding,
        "ns-1",
        "b-2"
    )));
}

#[test]
fn reapplying_updates_entry() {
    let test = TestConfig::default();
    IndexNamespacedResource::apply(&mut *test.index.write(), mk_secret("ns-0", "s-0"));

    let mut secret = mk_secret("ns-0", "s-0");
    secret.metadata.resource_version = Some("2".to_string());
    IndexNamespacedResource::apply(&mut *test.index.write(), secret);

    assert_eq!(
        test.index
            .read()
            .lookup(Kind::Secret, Some("ns-0"), "s-0")
            .and_then(|e| e.resource_version.clone()),
        Some("2".to_string())
    );
    assert_eq!(test.index.read().len(Kind::Secret), 1);
}

#[test]
fn reset_replaces_and_removes() {
    let test = TestConfig::default();
    IndexNamespacedResource::apply(&mut *test.index.write(), mk_quota("ns-0", "q-0"));
    IndexNamespacedResource::apply(&mut *test.index.write(), mk_quota("ns-1", "q-1"));

    let mut removed = NamespacedRemoved::default();
    removed
        .entry("ns-0".to_string())
        .or_default()
        .insert("q-0".to_string());
    IndexNamespacedResource::reset(
        &mut *test.index.write(),
        vec![mk_quota("ns-1", "q-1"), mk_quota("ns-2", "q-2")],
        removed,
    );

    let index = test.index.read();
    assert!(index.lookup(Kind::Quota, Some("ns-0"), "q-0").is_none());
    assert!(index.lookup(Kind::Quota, Some("ns-1"), "q-1").is_some());
    assert!(index.lookup(Kind::Quota, Some("ns-2"), "q-2").is_some());
    assert_eq!(index.len(Kind::Quota), 2);
}

#[test]
fn synced_after_every_kind_resets() {
    let test = TestConfig::default();
    assert!(!test.synced.is_synced());
    assert!(!test.index.read().is_synced());

    let mut index = test.index.write();
    IndexNamespacedResource::<Secret>::reset(&mut *index, vec![], Default::default());
    IndexNamespacedResource::<garden::Quota>::reset(&mut *index, vec![], Default::default());
    IndexNamespacedResource::<garden::SecretBinding>::reset(
        &mut *index,
        vec![],
        Default::default(),
    );
    IndexNamespacedResource::<garden::PrivateSecretBinding>::reset(
        &mut *index,
        vec![],
        Default::default(),
    );
    IndexNamespacedResource::<garden::CrossSecretBinding>::reset(
        &mut *index,
        vec![],
        Default::default(),
    );
    IndexClusterResource::<garden::CloudProfile>::reset(
        &mut *index,
        vec![mk_cloud_profile("cp-0")],
        ClusterRemoved::default(),
    );
    assert!(!index.is_synced(), "seeds have not been listed");
    assert!(!test.synced.is_synced());

    // Applies do not count as an initial listing.
    IndexClusterResource::apply(&mut *index, mk_seed("seed-0"));
    assert!(!test.synced.is_synced());

    IndexClusterResource::<garden::Seed>::reset(&mut *index, vec![], ClusterRemoved::default());
    assert!(index.is_synced());
    assert!(test.synced.is_synced());
    drop(index);

    // Subsequent resets are tolerated.
    IndexClusterResource::<garden::Seed>::reset(
        &mut *test.index.write(),
        vec![],
        ClusterRemoved::default(),
    );
    assert!(test.synced.is_synced());
}

#[tokio::test]
async fn wait_times_out_when_unsynced() {
    let test = TestConfig::default();
    assert!(!test.synced.wait(time::Duration::from_millis(10)).await);
}

#[tokio::test]
async fn wait_completes_when_synced() {
    let test = TestConfig::default();

    let waiter = tokio::spawn({
        let synced = test.synced.clone();
        async move { synced.wait(time::Duration::from_secs(10)).await }
    });
    tokio::task::yield_now().await;

    sync_all(&test.index);
    assert!(waiter.await.expect("waiter must not panic"));
    assert!(test.synced.wait(time::Duration::ZERO).await);
}

#[test]
fn kinds_served_by_garden_group() {
    assert_eq!(garden::SecretBinding::group(&()), API_GROUP);
    assert_eq!(garden::SecretBinding::version(&()), API_VERSION);
    assert_eq!(garden::Quota::group(&()), API_GROUP);
    assert_eq!(garden::Quota::plural(&()), Kind::Quota.resource());
    assert_eq!(garden::Seed::plural(&()), Kind::Seed.resource());
    assert_eq!(garden::Shoot::kind(&()), Kind::Shoot.as_str());
    assert_eq!(Secret::plural(&()), Kind::Secret.resource());
    assert_eq!(
        garden::CrossSecretBinding::plural(&()),
        Kind::CrossSecretBinding.resource()
    );
}

// === Helpers ===

struct TestConfig {
    index: SharedIndex,
    synced: Synced,
    _tracing: tracing::subscriber::DefaultGuard,
}

impl Default for TestConfig {
    fn default() -> Self {
        let _tracing = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::TRACE)
                .finish(),
        );
        let (index, synced) = Index::shared();
        Self {
            index,
            synced,
            _tracing,
        }
    }
}

fn sync_all(index: &SharedIndex) {
    let mut index = index.write();
    IndexNamespacedResource::<Secret>::reset(&mut *index, vec![], Default::default());
    IndexNamespacedResource::<garden::Quota>::reset(&mut *index, vec![], Default::default());
    IndexNamespacedResource::<garden::SecretBinding>::reset(
        &mut *index,
        vec![],
        Default::default(),
    );
    IndexNamespacedResource::<garden::PrivateSecretBinding>::reset(
        &mut *index,
        vec![],
        Default::default(),
    );
    IndexNamespacedResource::<garden::CrossSecretBinding>::reset(
        &mut *index,
        vec![],
        Default::default(),
    );
    IndexClusterResource::<garden::CloudProfile>::reset(&mut *index, vec![], Default::default());
    IndexClusterResource::<garden::Seed>::reset(&mut *index, vec![], Default::default());
}

fn mk_meta(ns: Option<&str>, name: &str) -> ObjectMeta {
    ObjectMeta {
        namespace: ns.map(ToString::to_string),
        name: Some(name.to_string()),
        uid: Some(match ns {
            Some(ns) => format!("{ns}.{name}"),
            None => name.to_string(),
        }),
        resource_version: Some("1".to_string()),
        ..Default::default()
    }
}

fn mk_secret(ns: &str, name: &str) -> Secret {
    Secret {
        metadata: mk_meta(Some(ns), name),
        string_data: Some(btreemap! {
            "token".to_string() => "not retained".to_string(),
        }),
        ..Default::default()
    }
}

fn mk_quota(ns: &str, name: &str) -> garden::Quota {
    garden::Quota {
        metadata: mk_meta(Some(ns), name),
        spec: Default::default(),
    }
}

fn mk_cloud_profile(name: &str) -> garden::CloudProfile {
    garden::CloudProfile {
        metadata: mk_meta(None, name),
        spec: garden::CloudProfileSpec {
            provider_type: "aws".to_string(),
            ..Default::default()
        },
    }
}

fn mk_seed(name: &str) -> garden::Seed {
    garden::Seed {
        metadata: mk_meta(None, name),
        spec: garden::SeedSpec {
            cloud: garden::seed::SeedCloud {
                profile: "cp-0".to_string(),
                region: Some("eu-west-1".to_string()),
            },
            secret_ref: SecretReference {
                namespace: "garden".to_string(),
                name: "seed-secret".to_string(),
            },
            ingress_domain: None,
        },
    }
}

fn mk_secret_binding(ns: &str, name: &str) -> garden::SecretBinding {
    garden::SecretBinding {
        metadata: mk_meta(Some(ns), name),
        spec: garden::SecretBindingSpec {
            secret_ref: ObjectReference {
                namespace: None,
                name: "s-0".to_string(),
            },
            quotas: vec![],
        },
    }
}

fn mk_private_binding(ns: &str, name: &str) -> garden::PrivateSecretBinding {
    garden::PrivateSecretBinding {
        metadata: mk_meta(Some(ns), name),
        spec: garden::PrivateSecretBindingSpec {
            secret_ref: LocalObjectReference {
                name: "s-0".to_string(),
            },
            quotas: vec![],
        },
    }
}

fn mk_cross_binding(ns: &str, name: &str) -> garden::CrossSecretBinding {
    garden::CrossSecretBinding {
        metadata: mk_meta(Some(ns), name),
        spec: garden::CrossSecretBindingSpec {
            secret_ref: SecretReference {
                namespace: "ns-1".to_string(),
                name: "s-0".to_string(),
            },
            quotas: vec![],
        },
    }
}

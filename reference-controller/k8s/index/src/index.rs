use crate::synced::{self, Synced};
use ahash::AHashMap as HashMap;
use kube::{
    core::{ClusterResourceScope, NamespaceResourceScope},
    Resource, ResourceExt,
};
use kubert::index::{ClusterRemoved, NamespacedRemoved};
use parking_lot::RwLock;
use reference_controller_core::Kind;
use reference_controller_k8s_api::{garden, Secret};
use std::{collections::hash_map::Entry as MapEntry, sync::Arc};
use tracing::{debug, info_span, warn};

pub type SharedIndex = Arc<RwLock<Index>>;

/// Holds the identity of every known instance of each indexed kind.
///
/// Owned and updated by the watch tasks; read by admission requests.
#[derive(Debug)]
pub struct Index {
    stores: HashMap<Kind, Store>,
    synced: synced::Pending,
}

/// The identity of an indexed resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    pub uid: Option<String>,
    pub resource_version: Option<String>,
}

/// Entries by namespace and name. Cluster-scoped kinds are stored under the empty namespace,
/// which is never a valid namespace name.
#[derive(Debug, Default)]
struct Store {
    by_ns: HashMap<String, HashMap<String, Entry>>,
}

/// Associates a watched resource type with its kind.
pub trait IndexedKind: Resource<DynamicType = ()> {
    const KIND: Kind;
}

impl IndexedKind for Secret {
    const KIND: Kind = Kind::Secret;
}

impl IndexedKind for garden::Quota {
    const KIND: Kind = Kind::Quota;
}

impl IndexedKind for garden::CloudProfile {
    const KIND: Kind = Kind::CloudProfile;
}

impl IndexedKind for garden::Seed {
    const KIND: Kind = Kind::Seed;
}

impl IndexedKind for garden::SecretBinding {
    const KIND: Kind = Kind::SecretBinding;
}

impl IndexedKind for garden::PrivateSecretBinding {
    const KIND: Kind = Kind::PrivateSecretBinding;
}

impl IndexedKind for garden::CrossSecretBinding {
    const KIND: Kind = Kind::CrossSecretBinding;
}

// === impl Index ===

impl Index {
    pub fn shared() -> (SharedIndex, Synced) {
        let (synced, rx) = synced::Pending::new(Kind::INDEXED);
        let stores = Kind::INDEXED
            .into_iter()
            .map(|kind| (kind, Store::default()))
            .collect();
        let index = Self { stores, synced };
        (Arc::new(RwLock::new(index)), rx)
    }

    /// Looks up a resource. `namespace` is ignored for cluster-scoped kinds.
    pub fn lookup(&self, kind: Kind, namespace: Option<&str>, name: &str) -> Option<&Entry> {
        let ns = if kind.is_namespaced() {
            namespace?
        } else {
            ""
        };
        self.stores.get(&kind)?.by_ns.get(ns)?.get(name)
    }

    /// Indicates whether every kind has completed its initial listing.
    pub fn is_synced(&self) -> bool {
        self.synced.is_complete()
    }

    /// Returns the number of indexed resources of `kind`.
    pub fn len(&self, kind: Kind) -> usize {
        self.stores.get(&kind).map(Store::len).unwrap_or(0)
    }

    pub(crate) fn namespaces(&self, kind: Kind) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.stores
            .get(&kind)
            .into_iter()
            .flat_map(|store| store.by_ns.iter())
            .map(|(ns, entries)| (ns.as_str(), entries.len()))
    }

    fn store_mut(&mut self, kind: Kind) -> &mut Store {
        self.stores.entry(kind).or_default()
    }

    fn apply_resource<T: IndexedKind>(&mut self, ns: String, resource: T) {
        let name = resource.name_unchecked();
        let _span = info_span!("apply", kind = %T::KIND, %ns, %name).entered();

        let meta = resource.meta();
        let entry = Entry {
            uid: meta.uid.clone(),
            resource_version: meta.resource_version.clone(),
        };
        if self.store_mut(T::KIND).insert(ns, name, entry) {
            debug!("Indexed");
        }
    }

    fn delete_resource(&mut self, kind: Kind, ns: String, name: String) {
        let _span = info_span!("delete", %kind, %ns, %name).entered();
        if self.store_mut(kind).remove(ns, &name) {
            debug!("Deleted");
        } else {
            debug!("Not indexed");
        }
    }
}

impl<T> kubert::index::IndexNamespacedResource<T> for Index
where
    T: IndexedKind<Scope = NamespaceResourceScope>,
{
    fn apply(&mut self, resource: T) {
        match resource.namespace() {
            Some(ns) => self.apply_resource(ns, resource),
            None => warn!(kind = %T::KIND, name = %resource.name_any(), "Missing namespace"),
        }
    }

    fn delete(&mut self, ns: String, name: String) {
        self.delete_resource(T::KIND, ns, name)
    }

    fn reset(&mut self, resources: Vec<T>, removed: NamespacedRemoved) {
        let _span = info_span!("reset", kind = %T::KIND).entered();
        debug!(resources = resources.len(), "Resetting");

        for resource in resources.into_iter() {
            kubert::index::IndexNamespacedResource::apply(self, resource);
        }
        for (ns, names) in removed.into_iter() {
            for name in names.into_iter() {
                self.delete_resource(T::KIND, ns.clone(), name);
            }
        }

        self.synced.complete(T::KIND);
    }
}

impl<T> kubert::index::IndexClusterResource<T> for Index
where
    T: IndexedKind<Scope = ClusterResourceScope>,
{
    fn apply(&mut self, resource: T) {
        self.apply_resource(String::new(), resource)
    }

    fn delete(&mut self, name: String) {
        self.delete_resource(T::KIND, String::new(), name)
    }

    fn reset(&mut self, resources: Vec<T>, removed: ClusterRemoved) {
        let _span = info_span!("reset", kind = %T::KIND).entered();
        debug!(resources = resources.len(), "Resetting");

        for resource in resources.into_iter() {
            self.apply_resource(String::new(), resource);
        }
        for name in removed.into_iter() {
            self.delete_resource(T::KIND, String::new(), name);
        }

        self.synced.complete(T::KIND);
    }
}

// === impl Store ===

impl Store {
    /// Returns true if the entry is new or changed.
    fn insert(&mut self, ns: String, name: String, entry: Entry) -> bool {
        let entries = self.by_ns.entry(ns).or_default();
        match entries.entry(name) {
            MapEntry::Occupied(mut e) if *e.get() != entry => {
                e.insert(entry);
                true
            }
            MapEntry::Occupied(_) => false,
            MapEntry::Vacant(e) => {
                e.insert(entry);
                true
            }
        }
    }

    fn remove(&mut self, ns: String, name: &str) -> bool {
        if let MapEntry::Occupied(mut entries) = self.by_ns.entry(ns) {
            let removed = entries.get_mut().remove(name).is_some();
            if entries.get().is_empty() {
                entries.remove();
            }
            return removed;
        }
        false
    }

    fn len(&self) -> usize {
        self.by_ns.values().map(|entries| entries.len()).sum()
    }
}

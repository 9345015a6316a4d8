use std::fmt;

/// The kinds of resources that may be the target of a reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Secret,
    Quota,
    CloudProfile,
    Seed,
    SecretBinding,
    PrivateSecretBinding,
    CrossSecretBinding,
    Shoot,
}

/// Identifies a single resource by kind, namespace, and name.
///
/// Cluster-scoped kinds never carry a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    pub kind: Kind,
    pub namespace: Option<String>,
    pub name: String,
}

/// A read-only view of the resources known to the controller.
///
/// Implementations may lag behind the API server. Lookups must not block on writers for longer
/// than it takes to read a single entry.
pub trait Lookup: Send + Sync {
    fn contains(&self, reference: &Reference) -> bool;
}

// === impl Kind ===

impl Kind {
    /// The kinds that are the target of references and must be indexed before admission.
    pub const INDEXED: [Kind; 7] = [
        Kind::Secret,
        Kind::Quota,
        Kind::CloudProfile,
        Kind::Seed,
        Kind::SecretBinding,
        Kind::PrivateSecretBinding,
        Kind::CrossSecretBinding,
    ];

    pub fn is_namespaced(self) -> bool {
        !matches!(self, Self::CloudProfile | Self::Seed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Secret => "Secret",
            Self::Quota => "Quota",
            Self::CloudProfile => "CloudProfile",
            Self::Seed => "Seed",
            Self::SecretBinding => "SecretBinding",
            Self::PrivateSecretBinding => "PrivateSecretBinding",
            Self::CrossSecretBinding => "CrossSecretBinding",
            Self::Shoot => "Shoot",
        }
    }

    /// The lowercase plural resource name, as used in RBAC rules.
    pub fn resource(self) -> &'static str {
        match self {
            Self::Secret => "secrets",
            Self::Quota => "quotas",
            Self::CloudProfile => "cloudprofiles",
            Self::Seed => "seeds",
            Self::SecretBinding => "secretbindings",
            Self::PrivateSecretBinding => "privatesecretbindings",
            Self::CrossSecretBinding => "crosssecretbindings",
            Self::Shoot => "shoots",
        }
    }

    /// Returns the API group and version serving this kind.
    pub fn group_version(self) -> (&'static str, &'static str) {
        match self {
            Self::Secret => ("", "v1"),
            _ => (crate::API_GROUP, crate::API_VERSION),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

// === impl Reference ===

impl Reference {
    pub fn namespaced(kind: Kind, namespace: impl ToString, name: impl ToString) -> Self {
        debug_assert!(kind.is_namespaced(), "{kind} is cluster-scoped");
        Self {
            kind,
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
        }
    }

    pub fn cluster(kind: Kind, name: impl ToString) -> Self {
        debug_assert!(!kind.is_namespaced(), "{kind} is namespaced");
        Self {
            kind,
            namespace: None,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace.as_deref() {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

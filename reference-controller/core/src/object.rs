use crate::{
    reference::{Kind, Reference},
    rejection::Rejection,
};

/// The subset of object metadata relevant to admission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Meta {
    pub namespace: Option<String>,
    pub name: String,

    /// Set once the object has a deletion timestamp and is waiting on finalizers.
    pub deleting: bool,
}

/// A resource whose references must be checked before it is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    SecretBinding(Binding),
    PrivateSecretBinding(Binding),
    CrossSecretBinding(Binding),
    Seed(Seed),
    Shoot(Shoot),
}

/// A namespaced reference whose namespace may be omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectRef {
    pub namespace: Option<String>,
    pub name: String,
}

/// Associates a secret and a set of quotas with a namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Binding {
    pub meta: Meta,
    pub secret_ref: ObjectRef,
    pub quotas: Vec<ObjectRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seed {
    pub meta: Meta,
    pub cloud_profile: String,
    pub secret_ref: ObjectRef,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shoot {
    pub meta: Meta,
    pub cloud_profile: String,
    pub seed: Option<String>,
    pub binding_ref: BindingRef,
}

/// Selects one of the binding variants by `kind` and a binding in the shoot's namespace by `name`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingRef {
    pub kind: String,
    pub name: String,
}

// === impl Object ===

impl Object {
    pub fn kind(&self) -> Kind {
        match self {
            Self::SecretBinding(_) => Kind::SecretBinding,
            Self::PrivateSecretBinding(_) => Kind::PrivateSecretBinding,
            Self::CrossSecretBinding(_) => Kind::CrossSecretBinding,
            Self::Seed(_) => Kind::Seed,
            Self::Shoot(_) => Kind::Shoot,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Self::SecretBinding(b)
            | Self::PrivateSecretBinding(b)
            | Self::CrossSecretBinding(b) => &b.meta,
            Self::Seed(s) => &s.meta,
            Self::Shoot(s) => &s.meta,
        }
    }
}

// === impl Meta ===

impl Meta {
    /// The object's namespace, or the empty string for cluster-scoped objects.
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }
}

// === impl ObjectRef ===

impl ObjectRef {
    /// Resolves the reference, defaulting to `local_ns` when no namespace is set.
    pub fn resolve(&self, kind: Kind, local_ns: &str) -> Reference {
        let ns = match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => ns,
            _ => local_ns,
        };
        Reference::namespaced(kind, ns, &self.name)
    }
}

// === impl BindingRef ===

impl BindingRef {
    pub const DEFAULT: &'static str = "default";
    pub const PRIVATE: &'static str = "private";
    pub const CROSS: &'static str = "cross";

    /// Maps the `kind` discriminator onto a binding variant.
    pub fn binding_kind(&self) -> Result<Kind, Rejection> {
        match self.kind.as_str() {
            "" | Self::DEFAULT => Ok(Kind::SecretBinding),
            Self::PRIVATE => Ok(Kind::PrivateSecretBinding),
            Self::CROSS => Ok(Kind::CrossSecretBinding),
            other => Err(Rejection::UnknownBindingKind(other.to_string())),
        }
    }
}

pub mod binding;
pub mod cloud_profile;
pub mod quota;
pub mod seed;
pub mod shoot;

pub use self::{
    binding::{
        CrossSecretBinding, CrossSecretBindingSpec, PrivateSecretBinding,
        PrivateSecretBindingSpec, SecretBinding, SecretBindingSpec,
    },
    cloud_profile::{CloudProfile, CloudProfileSpec},
    quota::{Quota, QuotaSpec},
    seed::{Seed, SeedSpec},
    shoot::{Shoot, ShootSpec},
};

/// References a resource by name within the referrer's own namespace.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
pub struct LocalObjectReference {
    pub name: String,
}

/// References a namespaced resource. When `namespace` is unset, the referrer's namespace is used.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
pub struct ObjectReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
}

/// References a secret in an explicit namespace.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
pub struct SecretReference {
    pub namespace: String,
    pub name: String,
}

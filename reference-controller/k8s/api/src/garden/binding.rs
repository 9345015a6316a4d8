use super::{LocalObjectReference, ObjectReference, SecretReference};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Binds a secret, and the quotas that limit its use, to the shoots in a namespace.
///
/// The author of a `SecretBinding` must be permitted to read the secret and each quota.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "core.garden.dev",
    version = "v1beta1",
    kind = "SecretBinding",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SecretBindingSpec {
    pub secret_ref: ObjectReference,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotas: Vec<ObjectReference>,
}

/// Binds a secret from the binding's own namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "core.garden.dev",
    version = "v1beta1",
    kind = "PrivateSecretBinding",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct PrivateSecretBindingSpec {
    pub secret_ref: LocalObjectReference,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotas: Vec<ObjectReference>,
}

/// Binds a secret from another namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "core.garden.dev",
    version = "v1beta1",
    kind = "CrossSecretBinding",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct CrossSecretBindingSpec {
    pub secret_ref: SecretReference,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotas: Vec<ObjectReference>,
}

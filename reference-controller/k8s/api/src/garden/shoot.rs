use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A managed cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(group = "core.garden.dev", version = "v1beta1", kind = "Shoot", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct ShootSpec {
    pub cloud: ShootCloud,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShootCloud {
    /// The name of a `CloudProfile`.
    pub profile: String,

    pub region: Option<String>,

    /// The name of the `Seed` hosting this shoot's control plane. When unset, a seed is chosen
    /// by the scheduler.
    pub seed: Option<String>,

    pub secret_binding_ref: SecretBindingReference,
}

/// Selects a binding in the shoot's namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SecretBindingReference {
    /// One of `default`, `private`, or `cross`. Empty selects `default`.
    #[serde(default)]
    pub kind: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn secret_binding_kind_defaults_to_empty() {
        let spec = serde_json::from_value::<ShootSpec>(serde_json::json!({
            "cloud": {
                "profile": "aws",
                "secretBindingRef": { "name": "my-binding" },
            }
        }))
        .expect("spec must parse");
        assert_eq!(spec.cloud.seed, None);
        assert_eq!(
            spec.cloud.secret_binding_ref,
            SecretBindingReference {
                kind: String::new(),
                name: "my-binding".to_string(),
            }
        );
    }
}

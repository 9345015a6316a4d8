use super::SecretReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A cluster that hosts the control planes of shoots.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(group = "core.garden.dev", version = "v1beta1", kind = "Seed")]
#[serde(rename_all = "camelCase")]
pub struct SeedSpec {
    pub cloud: SeedCloud,

    /// Credentials used to manage the seed cluster.
    pub secret_ref: SecretReference,

    pub ingress_domain: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedCloud {
    /// The name of a `CloudProfile`.
    pub profile: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_references_are_required() {
        let spec = serde_json::from_value::<SeedSpec>(serde_json::json!({
            "cloud": { "profile": "cp-0" },
            "secretRef": { "namespace": "garden", "name": "seed-secret" },
        }))
        .expect("spec must parse");
        assert_eq!(spec.cloud.profile, "cp-0");
        assert_eq!(spec.cloud.region, None);
        assert_eq!(spec.ingress_domain, None);
    }
}

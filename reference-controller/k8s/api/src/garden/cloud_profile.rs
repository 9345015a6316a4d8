use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Describes the infrastructure offered by a cloud provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(group = "core.garden.dev", version = "v1beta1", kind = "CloudProfile")]
#[serde(rename_all = "camelCase")]
pub struct CloudProfileSpec {
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub provider_type: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kubernetes_versions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_spec_parses() {
        let spec = serde_json::from_value::<CloudProfileSpec>(serde_json::json!({}))
            .expect("spec must parse");
        assert_eq!(spec, CloudProfileSpec::default());
    }
}

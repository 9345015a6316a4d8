use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Limits the resources that may be consumed through the bindings that reference it.
#[derive(Clone, Debug, Default, PartialEq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(group = "core.garden.dev", version = "v1beta1", kind = "Quota", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct QuotaSpec {
    #[serde(default)]
    pub scope: QuotaScope,

    pub cluster_lifetime_days: Option<u32>,

    #[serde(default)]
    pub metrics: BTreeMap<String, Quantity>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum QuotaScope {
    #[default]
    Project,
    Secret,
}

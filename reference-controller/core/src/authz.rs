use crate::reference::Reference;
use anyhow::Result;
use std::collections::BTreeMap;

/// The authenticated identity issuing a write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub uid: Option<String>,
    pub groups: Vec<String>,
    pub extra: BTreeMap<String, Vec<String>>,
}

/// An authorizer's verdict on a single request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    NoOpinion,
}

/// Describes an access to a single named resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceAttributes {
    pub verb: &'static str,
    pub group: &'static str,
    pub version: &'static str,
    pub resource: &'static str,
    pub namespace: Option<String>,
    pub name: String,
}

/// Decides whether a principal may access a resource.
///
/// Implementations should not cache decisions: the answer may depend on the exact namespace and
/// name being accessed.
#[async_trait::async_trait]
pub trait Authorize: Send + Sync {
    async fn authorize(
        &self,
        principal: &Principal,
        attributes: &ResourceAttributes,
    ) -> Result<Decision>;
}

// === impl ResourceAttributes ===

impl ResourceAttributes {
    /// Describes a `get` of the referenced resource.
    pub fn get(reference: &Reference) -> Self {
        let (group, version) = reference.kind.group_version();
        Self {
            verb: "get",
            group,
            version,
            resource: reference.kind.resource(),
            namespace: reference.namespace.clone(),
            name: reference.name.clone(),
        }
    }
}

use crate::{
    core::{Authorize, Decision, Principal, ResourceAttributes},
    k8s::{Api, Client},
};
use anyhow::{Context, Result};
use k8s_openapi::api::authorization::v1::{
    self as authz, SubjectAccessReview, SubjectAccessReviewSpec, SubjectAccessReviewStatus,
};
use kube::api::PostParams;
use tracing::{debug, instrument};

/// Authorizes principals by submitting a `SubjectAccessReview` for each request.
#[derive(Clone)]
pub struct SubjectAccessReviews {
    api: Api<SubjectAccessReview>,
}

// === impl SubjectAccessReviews ===

impl SubjectAccessReviews {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait::async_trait]
impl Authorize for SubjectAccessReviews {
    #[instrument(
        skip_all,
        fields(user = %principal.username, resource = %attrs.resource, name = %attrs.name)
    )]
    async fn authorize(
        &self,
        principal: &Principal,
        attrs: &ResourceAttributes,
    ) -> Result<Decision> {
        let review = self
            .api
            .create(&PostParams::default(), &mk_review(principal, attrs))
            .await
            .context("failed to create SubjectAccessReview")?;

        let decision = review.status.as_ref().map_or(Decision::NoOpinion, decision);
        debug!(?decision);
        Ok(decision)
    }
}

fn mk_review(principal: &Principal, attrs: &ResourceAttributes) -> SubjectAccessReview {
    SubjectAccessReview {
        spec: SubjectAccessReviewSpec {
            user: Some(principal.username.clone()),
            uid: principal.uid.clone(),
            groups: Some(principal.groups.clone()),
            extra: Some(principal.extra.clone()),
            resource_attributes: Some(authz::ResourceAttributes {
                verb: Some(attrs.verb.to_string()),
                group: Some(attrs.group.to_string()),
                version: Some(attrs.version.to_string()),
                resource: Some(attrs.resource.to_string()),
                namespace: attrs.namespace.clone(),
                name: Some(attrs.name.clone()),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn decision(status: &SubjectAccessReviewStatus) -> Decision {
    if status.allowed {
        Decision::Allow
    } else if status.denied == Some(true) {
        Decision::Deny
    } else {
        Decision::NoOpinion
    }
}

use crate::{
    core::{
        validate, Authorize, Binding, BindingRef, Kind, Meta, Object, ObjectRef, Operation,
        Principal, Rejection, Seed, Shoot, Validator,
    },
    index::{Reader, Synced},
    k8s::garden::{
        self, CrossSecretBindingSpec, ObjectReference, PrivateSecretBindingSpec,
        SecretBindingSpec, SeedSpec, ShootSpec,
    },
    metrics::{AdmissionMetrics, Decision},
};
use anyhow::{anyhow, Result};
use futures::future;
use http_body_util::BodyExt;
use hyper::{http, Request, Response};
use k8s_openapi::api::authentication::v1::UserInfo;
use kube::{
    core::{admission, DynamicObject},
    Resource, ResourceExt,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio::time;
use tracing::{debug, info, info_span, trace, warn, Instrument};


/// The operations that must be routed to the admission webhook.
pub const OPERATIONS: [Operation; 2] = [Operation::Create, Operation::Update];

/// The `(group, kind)` pairs that must be routed to the admission webhook.
pub const KINDS: [(&str, &str); 5] = [
    (crate::core::API_GROUP, "SecretBinding"),
    (crate::core::API_GROUP, "PrivateSecretBinding"),
    (crate::core::API_GROUP, "CrossSecretBinding"),
    (crate::core::API_GROUP, "Seed"),
    (crate::core::API_GROUP, "Shoot"),
];

/// Admits writes only when every resource they reference is known to the index.
#[derive(Clone)]
pub struct Admission {
    index: Reader,
    synced: Synced,
    sync_timeout: time::Duration,
    authz: Arc<dyn Authorize>,
    metrics: AdmissionMetrics,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read request body: {0}")]
    Request(#[from] hyper::Error),

    #[error("failed to encode json response: {0}")]
    Json(#[from] serde_json::Error),
}

type AdmissionRequest = admission::AdmissionRequest<DynamicObject>;
type AdmissionResponse = admission::AdmissionResponse;
type AdmissionReview = admission::AdmissionReview<DynamicObject>;

type Body = http_body_util::Full<bytes::Bytes>;

/// Converts a decoded spec into the object model checked by the validator.
trait IntoObject: DeserializeOwned {
    const KIND: Kind;

    fn into_object(self, meta: Meta) -> Object;
}

// === impl Admission ===

impl tower::Service<Request<hyper::body::Incoming>> for Admission {
    type Response = Response<Body>;
    type Error = Error;
    type Future = future::BoxFuture<'static, Result<Response<Body>, Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<hyper::body::Incoming>) -> Self::Future {
        trace!(?req);
        if req.method() != http::Method::POST || req.uri().path() != "/" {
            return Box::pin(future::ok(
                Response::builder()
                    .status(http::StatusCode::NOT_FOUND)
                    .body(Body::default())
                    .expect("not found response must be valid"),
            ));
        }

        let admission = self.clone();
        Box::pin(async move {
            use bytes::Buf;
            let bytes = req.into_body().collect().await?.to_bytes();
            let review: AdmissionReview = match serde_json::from_reader(bytes.reader()) {
                Ok(review) => review,
                Err(error) => {
                    warn!(%error, "Failed to parse request body");
                    return json_response(AdmissionResponse::invalid(error).into_review());
                }
            };
            trace!(?review);

            let rsp = match review.try_into() {
                Ok(req) => {
                    debug!(?req);
                    admission.admit(req).await
                }
                Err(error) => {
                    warn!(%error, "Invalid admission request");
                    AdmissionResponse::invalid(error)
                }
            };
            debug!(?rsp);
            json_response(rsp.into_review())
        })
    }
}

impl Admission {
    pub fn new(
        index: Reader,
        synced: Synced,
        sync_timeout: time::Duration,
        authz: Arc<dyn Authorize>,
        metrics: AdmissionMetrics,
    ) -> Self {
        Self {
            index,
            synced,
            sync_timeout,
            authz,
            metrics,
        }
    }

    /// Decides a single request. Holds no state between requests.
    pub async fn admit(&self, req: AdmissionRequest) -> AdmissionResponse {
        let rsp = AdmissionResponse::from(&req);

        let operation = match req.operation {
            admission::Operation::Create => Operation::Create,
            admission::Operation::Update => Operation::Update,
            admission::Operation::Delete => Operation::Delete,
            admission::Operation::Connect => Operation::Connect,
        };
        if !operation.is_inspected() {
            trace!(%operation, "Not inspected");
            return rsp;
        }

        let kind = req.kind.kind.clone();
        let kind_label = registered_kind(&req).unwrap_or("other");
        let ns = req.namespace.clone().unwrap_or_default();
        let name = req.name.clone();
        let span = info_span!("admit", %kind, %ns, %name, %operation);

        let res = self.check(operation, req).instrument(span.clone()).await;
        let _enter = span.enter();
        match res {
            Ok(()) => {
                self.metrics
                    .record(kind_label, operation.as_str(), Decision::Allowed);
                rsp
            }
            Err(rejection) => {
                info!(error = %rejection, "Denied");
                let (decision, code, reason) = status(&rejection);
                self.metrics.record(kind_label, operation.as_str(), decision);

                let mut rsp = rsp.deny(rejection);
                rsp.result.code = code.as_u16();
                rsp.result.reason = reason.to_string();
                rsp
            }
        }
    }

    async fn check(&self, operation: Operation, req: AdmissionRequest) -> Result<(), Rejection> {
        if !self.synced.wait(self.sync_timeout).await {
            return Err(Rejection::NotReady);
        }

        if is_kind::<garden::SecretBinding>(&req) {
            return self.check_spec::<SecretBindingSpec>(operation, req).await;
        }

        if is_kind::<garden::PrivateSecretBinding>(&req) {
            return self
                .check_spec::<PrivateSecretBindingSpec>(operation, req)
                .await;
        }

        if is_kind::<garden::CrossSecretBinding>(&req) {
            return self
                .check_spec::<CrossSecretBindingSpec>(operation, req)
                .await;
        }

        if is_kind::<garden::Seed>(&req) {
            return self.check_spec::<SeedSpec>(operation, req).await;
        }

        if is_kind::<garden::Shoot>(&req) {
            return self.check_spec::<ShootSpec>(operation, req).await;
        }

        debug!(group = %req.kind.group, "Unsupported kind");
        Ok(())
    }

    async fn check_spec<T: IntoObject>(
        &self,
        operation: Operation,
        req: AdmissionRequest,
    ) -> Result<(), Rejection> {
        let principal = principal(&req.user_info);
        let (obj, spec) = parse_spec::<T>(req).map_err(|error| {
            warn!(%error, "Failed to parse {} spec", T::KIND);
            Rejection::TypeMismatch {
                kind: T::KIND,
                reason: error.to_string(),
            }
        })?;

        let meta = Meta {
            namespace: obj.namespace(),
            name: obj.name_any(),
            deleting: obj.meta().deletion_timestamp.is_some(),
        };
        if validate::is_bypassed(operation, &meta) {
            debug!("Object is being deleted");
            return Ok(());
        }

        let object = spec.into_object(meta);
        Validator::new(&self.index, &*self.authz, &principal)
            .validate(&object)
            .await
    }
}

fn status(rejection: &Rejection) -> (Decision, http::StatusCode, &'static str) {
    match rejection {
        Rejection::NotReady => (
            Decision::NotReady,
            http::StatusCode::SERVICE_UNAVAILABLE,
            "ServiceUnavailable",
        ),
        Rejection::TypeMismatch { .. } => (
            Decision::BadRequest,
            http::StatusCode::BAD_REQUEST,
            "BadRequest",
        ),
        _ => (
            Decision::Forbidden,
            http::StatusCode::FORBIDDEN,
            "Forbidden",
        ),
    }
}

fn principal(user: &UserInfo) -> Principal {
    Principal {
        username: user.username.clone().unwrap_or_default(),
        uid: user.uid.clone(),
        groups: user.groups.clone().unwrap_or_default(),
        extra: user.extra.clone().unwrap_or_default(),
    }
}

/// Returns the registered kind a request is for, if any.
fn registered_kind(req: &AdmissionRequest) -> Option<&'static str> {
    KINDS
        .iter()
        .find(|(group, kind)| {
            req.kind.group.eq_ignore_ascii_case(group) && req.kind.kind.eq_ignore_ascii_case(kind)
        })
        .map(|(_, kind)| *kind)
}

fn is_kind<T>(req: &AdmissionRequest) -> bool
where
    T: Resource,
    T::DynamicType: Default,
{
    let dt = Default::default();
    req.kind.group.eq_ignore_ascii_case(&T::group(&dt))
        && req.kind.kind.eq_ignore_ascii_case(&T::kind(&dt))
}

fn json_response(rsp: AdmissionReview) -> Result<Response<Body>, Error> {
    let bytes = serde_json::to_vec(&rsp)?;
    Ok(Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .expect("admission review response must be valid"))
}

fn parse_spec<T: DeserializeOwned>(req: AdmissionRequest) -> Result<(DynamicObject, T)> {
    let obj = req
        .object
        .ok_or_else(|| anyhow!("admission request missing 'object'"))?;

    let spec = {
        let data = obj
            .data
            .get("spec")
            .cloned()
            .ok_or_else(|| anyhow!("admission request missing 'spec'"))?;
        serde_json::from_value(data)?
    };

    Ok((obj, spec))
}

fn object_ref(reference: ObjectReference) -> ObjectRef {
    ObjectRef {
        namespace: reference.namespace,
        name: reference.name,
    }
}

fn quota_refs(quotas: Vec<ObjectReference>) -> Vec<ObjectRef> {
    quotas.into_iter().map(object_ref).collect()
}

// === impl IntoObject ===

impl IntoObject for SecretBindingSpec {
    const KIND: Kind = Kind::SecretBinding;

    fn into_object(self, meta: Meta) -> Object {
        Object::SecretBinding(Binding {
            meta,
            secret_ref: object_ref(self.secret_ref),
            quotas: quota_refs(self.quotas),
        })
    }
}

impl IntoObject for PrivateSecretBindingSpec {
    const KIND: Kind = Kind::PrivateSecretBinding;

    fn into_object(self, meta: Meta) -> Object {
        Object::PrivateSecretBinding(Binding {
            secret_ref: ObjectRef {
                namespace: meta.namespace.clone(),
                name: self.secret_ref.name,
            },
            meta,
            quotas: quota_refs(self.quotas),
        })
    }
}

impl IntoObject for CrossSecretBindingSpec {
    const KIND: Kind = Kind::CrossSecretBinding;

    fn into_object(self, meta: Meta) -> Object {
        Object::CrossSecretBinding(Binding {
            meta,
            secret_ref: ObjectRef {
                namespace: Some(self.secret_ref.namespace),
                name: self.secret_ref.name,
            },
            quotas: quota_refs(self.quotas),
        })
    }
}

impl IntoObject for SeedSpec {
    const KIND: Kind = Kind::Seed;

    fn into_object(self, meta: Meta) -> Object {
        Object::Seed(Seed {
            meta,
            cloud_profile: self.cloud.profile,
            secret_ref: ObjectRef {
                namespace: Some(self.secret_ref.namespace),
                name: self.secret_ref.name,
            },
        })
    }
}

impl IntoObject for ShootSpec {
    const KIND: Kind = Kind::Shoot;

    fn into_object(self, meta: Meta) -> Object {
        let cloud = self.cloud;
        Object::Shoot(Shoot {
            meta,
            cloud_profile: cloud.profile,
            seed: cloud.seed,
            binding_ref: BindingRef {
                kind: cloud.secret_binding_ref.kind,
                name: cloud.secret_binding_ref.name,
            },
        })
    }
}

use crate::{
    authz::{Authorize, Decision, Principal, ResourceAttributes},
    object::{Binding, Meta, Object, ObjectRef, Seed, Shoot},
    reference::{Kind, Lookup, Reference},
    rejection::Rejection,
    Operation,
};
use tracing::{debug, trace, warn};


/// Checks an object's references on behalf of a single principal.
///
/// Holds no state between calls, so validating the same object against the same index yields
/// the same result.
pub struct Validator<'a, L: ?Sized, A: ?Sized> {
    lookup: &'a L,
    authz: &'a A,
    principal: &'a Principal,
}

/// Updates to objects that are being deleted are not checked: their finalizers must be able to
/// run even after the objects they reference are gone.
pub fn is_bypassed(operation: Operation, meta: &Meta) -> bool {
    operation == Operation::Update && meta.deleting
}

// === impl Validator ===

impl<'a, L, A> Validator<'a, L, A>
where
    L: Lookup + ?Sized,
    A: Authorize + ?Sized,
{
    pub fn new(lookup: &'a L, authz: &'a A, principal: &'a Principal) -> Self {
        Self {
            lookup,
            authz,
            principal,
        }
    }

    /// Returns the first reference of `object` that fails to resolve or that the principal may
    /// not read.
    pub async fn validate(&self, object: &Object) -> Result<(), Rejection> {
        match object {
            Object::SecretBinding(binding) => self.secret_binding(binding).await,

            // Unlike `SecretBinding`, neither of these variants check that the principal may
            // read the secret or quotas.
            Object::PrivateSecretBinding(binding) => {
                let ns = binding.meta.namespace();
                let secret = Reference::namespaced(Kind::Secret, ns, &binding.secret_ref.name);
                self.binding_refs(&secret, &binding.quotas, ns)
            }
            Object::CrossSecretBinding(binding) => {
                let ns = binding.meta.namespace();
                let secret = binding.secret_ref.resolve(Kind::Secret, ns);
                self.binding_refs(&secret, &binding.quotas, ns)
            }

            Object::Seed(seed) => self.seed(seed),
            Object::Shoot(shoot) => self.shoot(shoot),
        }
    }

    async fn secret_binding(&self, binding: &Binding) -> Result<(), Rejection> {
        let ns = binding.meta.namespace();

        let secret = binding.secret_ref.resolve(Kind::Secret, ns);
        self.ensure_exists(&secret)?;
        self.ensure_readable(Kind::SecretBinding, &secret).await?;

        let quotas = binding
            .quotas
            .iter()
            .map(|q| q.resolve(Kind::Quota, ns))
            .collect::<Vec<_>>();
        for quota in &quotas {
            self.ensure_exists(quota)?;
        }
        for quota in &quotas {
            self.ensure_readable(Kind::SecretBinding, quota).await?;
        }

        Ok(())
    }

    fn binding_refs(
        &self,
        secret: &Reference,
        quotas: &[ObjectRef],
        ns: &str,
    ) -> Result<(), Rejection> {
        self.ensure_exists(secret)?;
        for quota in quotas {
            self.ensure_exists(&quota.resolve(Kind::Quota, ns))?;
        }
        Ok(())
    }

    fn seed(&self, seed: &Seed) -> Result<(), Rejection> {
        self.ensure_exists(&Reference::cluster(Kind::CloudProfile, &seed.cloud_profile))?;
        // Seeds are cluster-scoped, so the secret reference must name its namespace.
        self.ensure_exists(&seed.secret_ref.resolve(Kind::Secret, ""))
    }

    fn shoot(&self, shoot: &Shoot) -> Result<(), Rejection> {
        self.ensure_exists(&Reference::cluster(Kind::CloudProfile, &shoot.cloud_profile))?;

        if let Some(seed) = shoot.seed.as_deref() {
            self.ensure_exists(&Reference::cluster(Kind::Seed, seed))?;
        }

        let kind = shoot.binding_ref.binding_kind()?;
        self.ensure_exists(&Reference::namespaced(
            kind,
            shoot.meta.namespace(),
            &shoot.binding_ref.name,
        ))
    }

    fn ensure_exists(&self, reference: &Reference) -> Result<(), Rejection> {
        if self.lookup.contains(reference) {
            trace!(%reference, "Found");
            return Ok(());
        }
        Err(Rejection::NotFound(reference.clone()))
    }

    async fn ensure_readable(
        &self,
        referrer: Kind,
        reference: &Reference,
    ) -> Result<(), Rejection> {
        let attributes = ResourceAttributes::get(reference);
        match self.authz.authorize(self.principal, &attributes).await {
            Ok(Decision::Allow) => return Ok(()),
            Ok(decision) => {
                debug!(?decision, user = %self.principal.username, %reference, "Not authorized")
            }
            Err(error) => {
                warn!(%error, user = %self.principal.username, %reference, "Failed to authorize")
            }
        }

        Err(Rejection::NotAuthorized {
            referrer,
            reference: reference.clone(),
        })
    }
}

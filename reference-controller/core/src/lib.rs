//! Reference integrity checks for garden resources.
//!
//! Resources in the garden API point at one another by name:
//!
//! ```text
//! [ Shoot ] -> [ SecretBinding | PrivateSecretBinding | CrossSecretBinding ] -> [ Secret ]
//!     |                                |
//!     |                                +-> [ Quota ]*
//!     +-> [ CloudProfile ]
//!     +-> [ Seed ] -> [ Secret ], [ CloudProfile ]
//! ```
//!
//! Before a resource is written, every reference it carries must resolve against the controller's
//! local view of the cluster. For `SecretBinding`s, the caller must additionally be permitted to
//! read the secret and quotas it points at, so that a binding can't be used to gain access to a
//! secret the caller could not read directly.
//!
//! This crate holds the Kubernetes-agnostic model of those rules. The index crate provides
//! [`Lookup`] and the runtime crate provides [`Authorize`].

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod authz;
mod object;
mod reference;
mod rejection;
pub mod validate;

pub use self::{
    authz::{Authorize, Decision, Principal, ResourceAttributes},
    object::{Binding, BindingRef, Meta, Object, ObjectRef, Seed, Shoot},
    reference::{Kind, Lookup, Reference},
    rejection::Rejection,
    validate::Validator,
};

/// The API group of the garden resources.
pub const API_GROUP: &str = "core.garden.dev";

/// The served version of the garden resources.
pub const API_VERSION: &str = "v1beta1";

/// The kind of write being admitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Connect,
}

impl Operation {
    /// Only creates and updates can introduce new references.
    pub fn is_inspected(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

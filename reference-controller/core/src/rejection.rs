use crate::reference::{Kind, Reference};
use thiserror::Error;

/// Why a write was refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    /// The controller has not yet loaded the resources it needs to make a decision. Callers
    /// should retry.
    #[error("not yet ready to handle request")]
    NotReady,

    #[error("referenced {0} not found")]
    NotFound(Reference),

    /// Shaped like `NotFound`, but the caller lacks read access to the reference.
    #[error("{referrer} cannot reference {reference}: not allowed to read it")]
    NotAuthorized { referrer: Kind, reference: Reference },

    #[error("unknown secret binding reference kind '{0}'")]
    UnknownBindingKind(String),

    /// The object in the request does not decode as the kind it claims to be.
    #[error("could not convert resource into {kind} object: {reason}")]
    TypeMismatch { kind: Kind, reason: String },
}

impl Rejection {
    /// Indicates whether the rejection is a policy decision about the object's references, as
    /// opposed to a transient or malformed request.
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::NotAuthorized { .. } | Self::UnknownBindingKind(_)
        )
    }
}

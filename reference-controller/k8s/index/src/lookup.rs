use crate::index::SharedIndex;
use reference_controller_core::{Lookup, Reference};

/// Resolves references against a shared index.
///
/// Each lookup holds the index's read lock only for the duration of the lookup.
#[derive(Clone, Debug)]
pub struct Reader(SharedIndex);

impl Reader {
    pub fn new(index: SharedIndex) -> Self {
        Self(index)
    }
}

impl Lookup for Reader {
    fn contains(&self, reference: &Reference) -> bool {
        self.0
            .read()
            .lookup(
                reference.kind,
                reference.namespace.as_deref(),
                &reference.name,
            )
            .is_some()
    }
}

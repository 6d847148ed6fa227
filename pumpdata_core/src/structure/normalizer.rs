//! Normalize-side collaborator.

use super::origin::Origin;
use super::pointer;

/// Carries the document origin and the pointer of the object being
/// normalized. Normalization only rewrites values for external documents.
#[derive(Clone, Debug)]
pub struct Normalizer {
    origin: Origin,
    pointer: String,
}

impl Normalizer {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            pointer: String::new(),
        }
    }

    pub fn with_reference(&self, reference: &str) -> Normalizer {
        Normalizer {
            origin: self.origin,
            pointer: pointer::append(&self.pointer, reference),
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_external(&self) -> bool {
        self.origin == Origin::External
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

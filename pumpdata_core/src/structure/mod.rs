//! Parser, validator and normalizer collaborators shared by every datum.
//!
//! Datum types describe their fields in terms of these; the collaborators
//! track JSON pointers, owning-datum metadata, document origin and the
//! accumulated [`Issue`]s.

mod issue;
mod normalizer;
mod origin;
mod parser;
pub mod pointer;
mod validator;

pub use issue::{Issue, Meta, ValidationError};
pub use normalizer::Normalizer;
pub use origin::Origin;
pub use parser::{ArrayParser, ObjectParser};
pub use validator::{
    BoolValidator, Float64Validator, IntValidator, PresenceValidator, StringArrayValidator,
    StringValidator, Validator,
};

use std::collections::HashMap;

/// Populate `self` from a JSON object.
///
/// Absent fields stay `None`; nothing is defaulted.
pub trait Parse {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>);
}

/// Map keys in lexicographic order.
///
/// Named maps are validated and normalized in this order so that issue
/// ordering does not depend on hash iteration order.
pub fn sorted_names<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
}

//! Provenance of a document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a document came from.
///
/// Only external documents (submitted by a client or device) are rewritten
/// by normalization; internal and store documents are already canonical.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    External,
    Internal,
    Store,
}

impl Origin {
    pub const ALL: [Origin; 3] = [Origin::External, Origin::Internal, Origin::Store];

    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::External => "external",
            Origin::Internal => "internal",
            Origin::Store => "store",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Origin {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "external" => Ok(Origin::External),
            "internal" => Ok(Origin::Internal),
            "store" => Ok(Origin::Store),
            other => Err(crate::Error::Config(format!("unknown origin '{}'", other))),
        }
    }
}

use crate::constants::{DEBUG_FLAGS, FEATURE_FLAGS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classifies a flag as a product feature or a debugging aid.
///
/// Debugging flags are structurally incapable of being true outside debug
/// builds; feature flags follow normal precedence in every build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainTag {
    Feature,
    Debugging,
}

impl DomainTag {
    /// Name of the suite sub-dictionary holding this domain's overrides.
    #[must_use]
    pub const fn domain_key(self) -> &'static str {
        match self {
            Self::Feature => FEATURE_FLAGS,
            Self::Debugging => DEBUG_FLAGS,
        }
    }
}

impl fmt::Display for DomainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Feature => "feature",
            Self::Debugging => "debugging",
        })
    }
}
